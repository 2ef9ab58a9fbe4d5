// src/handlers/leads.rs

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{batch::BatchReport, error::AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermLeadsAssign, PermLeadsDelete, RequirePermission},
    },
    models::{
        filters::LeadQuery,
        lead::{ContactStatus, Lead, LeadSource, LeadStatus},
    },
    services::lead_page::Page,
};

// =============================================================================
//  ÁREA 1: LISTAGEM (filtro -> ordenação -> paginação) E EXPORTAÇÃO
// =============================================================================

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    responses(
        (status = 200, description = "Página do conjunto filtrado e ordenado", body = Page<Lead>),
        (status = 400, description = "Parâmetros inválidos")
    ),
    security(("api_bearer" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(mut query): Query<LeadQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;
    apply_saved_filter(&app_state, &user, &mut query).await?;

    let page = app_state.lead_service.list(&user.0, &query).await?;
    Ok((StatusCode::OK, Json(page)))
}

// Um `saved_filter=<id>` na query string carrega os critérios salvos por
// cima dos filtros avançados enviados.
async fn apply_saved_filter(
    app_state: &AppState,
    user: &AuthenticatedUser,
    query: &mut LeadQuery,
) -> Result<(), AppError> {
    if let Some(filter_id) = query.saved_filter.clone() {
        let saved = app_state
            .saved_filter_service
            .resolve(&user.0, &filter_id)
            .await?;
        query.apply_saved(&saved.criteria);
    }
    Ok(())
}

// GET /api/leads/form-names
#[utoipa::path(
    get,
    path = "/api/leads/form-names",
    tag = "Leads",
    responses(
        (status = 200, description = "Nomes de formulário derivados das notas", body = Vec<String>)
    ),
    security(("api_bearer" = []))
)]
pub async fn list_form_names(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let names = app_state.lead_service.form_names().await?;
    Ok((StatusCode::OK, Json(names)))
}

// GET /api/leads/export
#[utoipa::path(
    get,
    path = "/api/leads/export",
    tag = "Leads",
    responses(
        (status = 200, description = "CSV do conjunto filtrado e ordenado (nunca paginado)")
    ),
    security(("api_bearer" = []))
)]
pub async fn export_leads(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(mut query): Query<LeadQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;
    apply_saved_filter(&app_state, &user, &mut query).await?;

    let (filename, body) = app_state.lead_service.export_csv(&user.0, &query).await?;
    let headers = [
        (
            header::CONTENT_TYPE,
            "text/csv; charset=utf-8".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((StatusCode::OK, headers, body))
}

// =============================================================================
//  ÁREA 2: CRUD UNITÁRIO
// =============================================================================

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateLeadPayload {
    #[validate(length(min = 1, message = "required"))]
    pub lead_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[validate(email(message = "invalid_email"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_status: Option<ContactStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_source: Option<LeadSource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_follow_up: Option<DateTime<Utc>>,

    #[serde(default)]
    pub is_cold: bool,
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = Lead),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_bearer" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let record = serde_json::to_value(&payload)?;
    let lead = app_state.lead_service.create(record).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateLeadPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_status: Option<ContactStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_source: Option<LeadSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_follow_up: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_cold: Option<bool>,
}

// PATCH /api/leads/{id}
#[utoipa::path(
    patch,
    path = "/api/leads/{id}",
    tag = "Leads",
    request_body = UpdateLeadPayload,
    responses(
        (status = 204, description = "Lead atualizado"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_bearer" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let patch = serde_json::to_value(&payload)?;
    app_state.lead_service.update(&id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "Leads",
    responses(
        (status = 204, description = "Lead removido"),
        (status = 403, description = "Sem a capacidade leads:delete")
    ),
    security(("api_bearer" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermLeadsDelete>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.lead_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 3: AÇÕES EM LOTE
//  O corpo traz a seleção E o contexto de filtro; o servidor recalcula o
//  conjunto visível e intersecciona antes de tocar qualquer registro.
// =============================================================================

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct BulkActionPayload {
    pub ids: Vec<String>,
    pub select_all: bool,
    pub context: LeadQuery,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkAssignPayload {
    #[validate(email(message = "invalid_email"))]
    pub assignee: String,

    #[serde(flatten)]
    pub selection: BulkActionPayload,
}

// POST /api/leads/bulk/mark-contacted
#[utoipa::path(
    post,
    path = "/api/leads/bulk/mark-contacted",
    tag = "Leads",
    request_body = BulkActionPayload,
    responses(
        (status = 200, description = "Relatório por item (leads de outro dono são pulados)", body = BatchReport)
    ),
    security(("api_bearer" = []))
)]
pub async fn bulk_mark_contacted(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<BulkActionPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Mesma regra das caixas de seleção: admin ou alguma capacidade de
    // escrita sobre leads.
    if !user.0.can_bulk_select() {
        return Err(AppError::PermissionDenied("leads:update".into()));
    }

    let report = app_state
        .lead_service
        .mark_contacted(&user.0, &payload.context, payload.ids, payload.select_all)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// POST /api/leads/bulk/assign
#[utoipa::path(
    post,
    path = "/api/leads/bulk/assign",
    tag = "Leads",
    request_body = BulkAssignPayload,
    responses(
        (status = 200, description = "Relatório por item", body = BatchReport),
        (status = 403, description = "Sem a capacidade leads:assign"),
        (status = 404, description = "Responsável não existe no painel")
    ),
    security(("api_bearer" = []))
)]
pub async fn bulk_assign(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermLeadsAssign>,
    Json(payload): Json<BulkAssignPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let report = app_state
        .lead_service
        .bulk_assign(
            &user.0,
            &payload.selection.context,
            payload.selection.ids,
            payload.selection.select_all,
            &payload.assignee,
        )
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// POST /api/leads/bulk/unassign
#[utoipa::path(
    post,
    path = "/api/leads/bulk/unassign",
    tag = "Leads",
    request_body = BulkActionPayload,
    responses(
        (status = 200, description = "Relatório por item", body = BatchReport),
        (status = 403, description = "Sem a capacidade leads:assign")
    ),
    security(("api_bearer" = []))
)]
pub async fn bulk_unassign(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermLeadsAssign>,
    Json(payload): Json<BulkActionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .lead_service
        .bulk_unassign(&user.0, &payload.context, payload.ids, payload.select_all)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// POST /api/leads/bulk/delete
#[utoipa::path(
    post,
    path = "/api/leads/bulk/delete",
    tag = "Leads",
    request_body = BulkActionPayload,
    responses(
        (status = 200, description = "Relatório por item", body = BatchReport),
        (status = 403, description = "Sem a capacidade leads:delete")
    ),
    security(("api_bearer" = []))
)]
pub async fn bulk_delete(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermLeadsDelete>,
    Json(payload): Json<BulkActionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .lead_service
        .bulk_delete(&user.0, &payload.context, payload.ids, payload.select_all)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// =============================================================================
//  ÁREA 4: SINCRONIZAÇÃO
// =============================================================================

// POST /api/leads/sync-facebook
#[utoipa::path(
    post,
    path = "/api/leads/sync-facebook",
    tag = "Leads",
    responses(
        (status = 200, description = "Mensagem do upstream, repassada como veio")
    ),
    security(("api_bearer" = []))
)]
pub async fn sync_facebook(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let response: Value = app_state.lead_service.sync_facebook().await?;
    Ok((StatusCode::OK, Json(response)))
}
