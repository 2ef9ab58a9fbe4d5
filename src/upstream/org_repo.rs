// src/upstream/org_repo.rs

use serde_json::{Value, json};

use crate::common::error::AppError;
use crate::models::settings::Organization;
use crate::upstream::EntityClient;

const ENTITY: &str = "Organization";

#[derive(Clone)]
pub struct OrganizationRepository {
    client: EntityClient,
}

impl OrganizationRepository {
    pub fn new(client: EntityClient) -> Self {
        Self { client }
    }

    /// A organização é um registro único; pegamos o primeiro da coleção.
    pub async fn get(&self) -> Result<Organization, AppError> {
        let orgs: Vec<Organization> = self.client.list(ENTITY, None, Some(1)).await?;
        orgs.into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Organização".into()))
    }

    pub async fn set_auto_assign_paused(&self, id: &str, paused: bool) -> Result<(), AppError> {
        let patch = json!({ "settings": { "autoAssignPaused": paused } });
        let _: Value = self.client.update(ENTITY, id, patch).await?;
        Ok(())
    }
}
