// src/services/settings_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    models::settings::{AutoAssignStatus, Organization},
    upstream::{OrganizationRepository, QueryCache, cache::ORGANIZATION_KEY},
};

// A auto-atribuição em si roda no upstream; aqui só lemos e alternamos a
// flag `settings.autoAssignPaused` da organização.
#[derive(Clone)]
pub struct SettingsService {
    orgs: OrganizationRepository,
    cache: Arc<QueryCache>,
}

impl SettingsService {
    pub fn new(orgs: OrganizationRepository, cache: Arc<QueryCache>) -> Self {
        Self { orgs, cache }
    }

    async fn organization(&self) -> Result<Organization, AppError> {
        let orgs = self.orgs.clone();
        self.cache
            .get_or_fetch(ORGANIZATION_KEY, move || async move { orgs.get().await })
            .await
    }

    pub async fn auto_assign_status(&self) -> Result<AutoAssignStatus, AppError> {
        let org = self.organization().await?;
        Ok(AutoAssignStatus {
            auto_assign_paused: org.settings.auto_assign_paused,
        })
    }

    /// Alterna a pausa e invalida o cache: a próxima leitura reconcilia com
    /// o estado autoritativo do servidor.
    pub async fn set_auto_assign_paused(
        &self,
        paused: bool,
    ) -> Result<AutoAssignStatus, AppError> {
        let org = self.organization().await?;
        self.orgs.set_auto_assign_paused(&org.id, paused).await?;
        self.cache.invalidate(ORGANIZATION_KEY).await;
        Ok(AutoAssignStatus {
            auto_assign_paused: paused,
        })
    }
}
