// src/upstream/saved_filter_repo.rs

use serde_json::Value;

use crate::common::error::AppError;
use crate::models::filters::SavedFilter;
use crate::upstream::EntityClient;

const ENTITY: &str = "SavedFilter";

#[derive(Clone)]
pub struct SavedFilterRepository {
    client: EntityClient,
}

impl SavedFilterRepository {
    pub fn new(client: EntityClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<SavedFilter>, AppError> {
        self.client.list(ENTITY, Some("-created_date"), None).await
    }

    pub async fn get(&self, id: &str) -> Result<SavedFilter, AppError> {
        self.client.get(ENTITY, id).await
    }

    pub async fn create(&self, record: Value) -> Result<SavedFilter, AppError> {
        self.client.create(ENTITY, record).await
    }

    pub async fn update(&self, id: &str, patch: Value) -> Result<(), AppError> {
        self.client.update(ENTITY, id, patch).await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.client.delete(ENTITY, id).await
    }
}
