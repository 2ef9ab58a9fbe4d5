// src/upstream/activity_repo.rs

use serde_json::Value;

use crate::common::error::AppError;
use crate::models::activity::NewLeadActivity;
use crate::upstream::EntityClient;

const ENTITY: &str = "RELeadActivity";

#[derive(Clone)]
pub struct ActivityRepository {
    client: EntityClient,
}

impl ActivityRepository {
    pub fn new(client: EntityClient) -> Self {
        Self { client }
    }

    /// Grava uma linha no histórico do lead.
    pub async fn log(&self, activity: &NewLeadActivity) -> Result<(), AppError> {
        let record = serde_json::to_value(activity)?;
        let _: Value = self.client.create(ENTITY, record).await?;
        Ok(())
    }
}
