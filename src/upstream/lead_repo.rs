// src/upstream/lead_repo.rs

use serde_json::{Value, json};

use crate::common::error::AppError;
use crate::models::lead::Lead;
use crate::upstream::EntityClient;

const ENTITY: &str = "Lead";

// Acesso tipado à entidade Lead no upstream. A coleção é lida por inteiro
// (ordenada por criação, mais recentes primeiro); todo refinamento acontece
// no pipeline de filtro/ordenação local.
#[derive(Clone)]
pub struct LeadRepository {
    client: EntityClient,
}

impl LeadRepository {
    pub fn new(client: EntityClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Lead>, AppError> {
        self.client.list(ENTITY, Some("-created_date"), None).await
    }

    pub async fn create(&self, record: Value) -> Result<Lead, AppError> {
        self.client.create(ENTITY, record).await
    }

    pub async fn update(&self, id: &str, patch: Value) -> Result<(), AppError> {
        self.client.update(ENTITY, id, patch).await?;
        Ok(())
    }

    pub async fn assign(&self, id: &str, assignee: Option<&str>) -> Result<(), AppError> {
        self.update(id, json!({ "assigned_to": assignee })).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.client.delete(ENTITY, id).await
    }

    /// Dispara a sincronização de leads do Facebook no servidor.
    pub async fn sync_facebook(&self) -> Result<Value, AppError> {
        self.client.invoke("fetchFacebookLeads", json!({})).await
    }
}
