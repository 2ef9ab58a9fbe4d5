// src/services/lead_service.rs

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};

use crate::{
    common::{
        batch::{BULK_CONCURRENCY, BatchOutcome, BatchReport, run_batch},
        error::AppError,
    },
    models::{
        activity::{ActivityKind, NewLeadActivity},
        auth::CurrentUser,
        filters::LeadQuery,
        lead::{Lead, LeadStatus},
    },
    services::{
        export_service,
        lead_filter::{self, FilterContext},
        lead_page::{self, Page},
        lead_sort, selection,
    },
    upstream::{
        ActivityRepository, DirectoryRepository, LeadRepository, QueryCache,
        cache::{DASHBOARD_USERS_KEY, LEADS_KEY, LEADS_LEGACY_KEY},
    },
};

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
    activities: ActivityRepository,
    directory: DirectoryRepository,
    cache: Arc<QueryCache>,
}

impl LeadService {
    pub fn new(
        repo: LeadRepository,
        activities: ActivityRepository,
        directory: DirectoryRepository,
        cache: Arc<QueryCache>,
    ) -> Self {
        Self {
            repo,
            activities,
            directory,
            cache,
        }
    }

    // =========================================================================
    //  LEITURA (pipeline filtro -> ordenação -> paginação)
    // =========================================================================

    /// Coleção inteira, via cache com leitura-através.
    async fn all_leads(&self) -> Result<Vec<Lead>, AppError> {
        let repo = self.repo.clone();
        self.cache
            .get_or_fetch(LEADS_KEY, move || async move { repo.list().await })
            .await
    }

    /// Conjunto visível para o viewer: filtrado e ordenado, sem paginação.
    /// É a base da listagem, da exportação e da resolução de seleção.
    async fn visible(&self, viewer: &CurrentUser, query: &LeadQuery) -> Result<Vec<Lead>, AppError> {
        let leads = self.all_leads().await?;
        let ctx = FilterContext {
            viewer,
            query,
            today: Utc::now().date_naive(),
        };
        let mut visible = lead_filter::filter_leads(leads, &ctx);
        lead_sort::sort_leads(&mut visible, query.sort_by, query.sort_dir);
        Ok(visible)
    }

    pub async fn list(
        &self,
        viewer: &CurrentUser,
        query: &LeadQuery,
    ) -> Result<Page<Lead>, AppError> {
        let visible = self.visible(viewer, query).await?;
        Ok(lead_page::paginate(visible, query.page, query.per_page))
    }

    pub async fn form_names(&self) -> Result<Vec<String>, AppError> {
        let leads = self.all_leads().await?;
        Ok(lead_filter::available_form_names(&leads))
    }

    /// Exporta o conjunto filtrado+ordenado (nunca paginado) como CSV.
    pub async fn export_csv(
        &self,
        viewer: &CurrentUser,
        query: &LeadQuery,
    ) -> Result<(String, String), AppError> {
        let visible = self.visible(viewer, query).await?;
        let filename = export_service::export_filename(Utc::now().date_naive());
        Ok((filename, export_service::render_csv(&visible)))
    }

    // =========================================================================
    //  CRUD UNITÁRIO
    // =========================================================================

    pub async fn create(&self, record: Value) -> Result<Lead, AppError> {
        let lead = self.repo.create(record).await?;
        self.invalidate_leads().await;
        Ok(lead)
    }

    pub async fn update(&self, id: &str, patch: Value) -> Result<(), AppError> {
        self.repo.update(id, patch).await?;
        self.invalidate_leads().await;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.repo.delete(id).await?;
        self.invalidate_leads().await;
        Ok(())
    }

    // =========================================================================
    //  AÇÕES EM LOTE
    //  A seleção efetiva é sempre (pedido ∩ conjunto visível), na ordem
    //  visível; ids escondidos pelo filtro nunca sofrem mutação.
    // =========================================================================

    async fn resolve_targets(
        &self,
        viewer: &CurrentUser,
        query: &LeadQuery,
        ids: &[String],
        select_all: bool,
    ) -> Result<Vec<(String, Lead)>, AppError> {
        let visible = self.visible(viewer, query).await?;
        let targets = selection::resolve(visible, ids, select_all);
        Ok(targets
            .into_iter()
            .map(|lead| (lead.id.clone(), lead))
            .collect())
    }

    /// Marca como contatado, sequencialmente: a atividade de um registro é
    /// gravada antes do próximo registro ser atualizado. Leads de outro
    /// dono são pulados (sem erro) quando o viewer não é admin.
    pub async fn mark_contacted(
        &self,
        viewer: &CurrentUser,
        query: &LeadQuery,
        ids: Vec<String>,
        select_all: bool,
    ) -> Result<BatchReport, AppError> {
        let targets = self.resolve_targets(viewer, query, &ids, select_all).await?;

        let repo = self.repo.clone();
        let activities = self.activities.clone();
        let is_admin = viewer.is_admin();
        let viewer_email = viewer.normalized_email();
        let actor = viewer.email.clone();

        let report = run_batch(targets, 1, move |lead: Lead| {
            let repo = repo.clone();
            let activities = activities.clone();
            let viewer_email = viewer_email.clone();
            let actor = actor.clone();
            async move {
                let owner = lead
                    .assigned_to
                    .as_deref()
                    .map(|o| o.trim().to_lowercase())
                    .unwrap_or_default();
                if !is_admin && owner != viewer_email {
                    return Ok(BatchOutcome::Skipped);
                }

                repo.update(
                    &lead.id,
                    json!({
                        "last_contact_date": Utc::now(),
                        "status": "contacted",
                    }),
                )
                .await?;

                let (kind, message) = if lead.status == LeadStatus::New {
                    (
                        ActivityKind::StageChange,
                        "Contacted & Stage Updated: New → Contacted",
                    )
                } else {
                    (ActivityKind::StatusChange, "Status: Marked as contacted")
                };
                activities
                    .log(&NewLeadActivity {
                        lead_id: lead.id.clone(),
                        activity_type: kind,
                        message: message.to_string(),
                        performed_by: actor.clone(),
                    })
                    .await?;

                Ok(BatchOutcome::Done)
            }
        })
        .await;

        self.invalidate_leads().await;
        Ok(report)
    }

    /// Atribui os selecionados a um membro conhecido do painel.
    pub async fn bulk_assign(
        &self,
        viewer: &CurrentUser,
        query: &LeadQuery,
        ids: Vec<String>,
        select_all: bool,
        assignee: &str,
    ) -> Result<BatchReport, AppError> {
        let directory = self
            .cache
            .get_or_fetch(DASHBOARD_USERS_KEY, {
                let directory = self.directory.clone();
                move || async move { directory.dashboard_users().await }
            })
            .await?;
        let known = directory
            .users
            .iter()
            .any(|user| user.email.eq_ignore_ascii_case(assignee));
        if !known {
            return Err(AppError::UserNotFound);
        }

        let targets = self.resolve_targets(viewer, query, &ids, select_all).await?;

        let repo = self.repo.clone();
        let activities = self.activities.clone();
        let actor = viewer.email.clone();
        let assignee = assignee.to_string();

        let report = run_batch(targets, BULK_CONCURRENCY, move |lead: Lead| {
            let repo = repo.clone();
            let activities = activities.clone();
            let actor = actor.clone();
            let assignee = assignee.clone();
            async move {
                repo.assign(&lead.id, Some(&assignee)).await?;
                activities
                    .log(&NewLeadActivity {
                        lead_id: lead.id.clone(),
                        activity_type: ActivityKind::Assignment,
                        message: format!("Assigned to {assignee}"),
                        performed_by: actor.clone(),
                    })
                    .await?;
                Ok(BatchOutcome::Done)
            }
        })
        .await;

        self.invalidate_leads().await;
        Ok(report)
    }

    /// Remove a atribuição de todos os selecionados. Sem pulo por item:
    /// o gate de capacidade já aconteceu no handler.
    pub async fn bulk_unassign(
        &self,
        viewer: &CurrentUser,
        query: &LeadQuery,
        ids: Vec<String>,
        select_all: bool,
    ) -> Result<BatchReport, AppError> {
        let targets = self.resolve_targets(viewer, query, &ids, select_all).await?;

        let repo = self.repo.clone();
        let report = run_batch(targets, BULK_CONCURRENCY, move |lead: Lead| {
            let repo = repo.clone();
            async move {
                repo.assign(&lead.id, None).await?;
                Ok(BatchOutcome::Done)
            }
        })
        .await;

        self.invalidate_leads().await;
        Ok(report)
    }

    pub async fn bulk_delete(
        &self,
        viewer: &CurrentUser,
        query: &LeadQuery,
        ids: Vec<String>,
        select_all: bool,
    ) -> Result<BatchReport, AppError> {
        let targets = self.resolve_targets(viewer, query, &ids, select_all).await?;

        let repo = self.repo.clone();
        let report = run_batch(targets, BULK_CONCURRENCY, move |lead: Lead| {
            let repo = repo.clone();
            async move {
                repo.delete(&lead.id).await?;
                Ok(BatchOutcome::Done)
            }
        })
        .await;

        self.invalidate_leads().await;
        Ok(report)
    }

    // =========================================================================
    //  SINCRONIZAÇÃO E CACHE
    // =========================================================================

    /// Dispara a sincronização de leads do Facebook e devolve a mensagem do
    /// upstream como veio.
    pub async fn sync_facebook(&self) -> Result<Value, AppError> {
        let response = self.repo.sync_facebook().await?;
        self.invalidate_leads().await;
        Ok(response)
    }

    /// Recarga periódica feita pelo worker (consistência eventual com
    /// edições de outras sessões).
    pub async fn refresh(&self) -> Result<(), AppError> {
        let leads = self.repo.list().await?;
        self.cache.put(LEADS_KEY, &leads).await
    }

    async fn invalidate_leads(&self) {
        self.cache
            .invalidate_many(&[LEADS_KEY, LEADS_LEGACY_KEY])
            .await;
    }
}
