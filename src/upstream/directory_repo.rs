// src/upstream/directory_repo.rs

use serde_json::json;

use crate::common::error::AppError;
use crate::models::directory::{DashboardDirectory, Department, FacebookPageConnection};
use crate::upstream::EntityClient;

// Listas de referência usadas pelos filtros e pelo diálogo de atribuição.
#[derive(Clone)]
pub struct DirectoryRepository {
    client: EntityClient,
}

impl DirectoryRepository {
    pub fn new(client: EntityClient) -> Self {
        Self { client }
    }

    /// Usuários do painel (e convites pendentes), via função de servidor.
    pub async fn dashboard_users(&self) -> Result<DashboardDirectory, AppError> {
        self.client.invoke("getDashboardUsers", json!({})).await
    }

    pub async fn departments(&self) -> Result<Vec<Department>, AppError> {
        self.client.list("Department", Some("name"), None).await
    }

    /// Só as conexões ativas interessam ao filtro de página.
    pub async fn facebook_pages(&self) -> Result<Vec<FacebookPageConnection>, AppError> {
        self.client
            .filter("FacebookPageConnection", json!({ "active": true }), None, None)
            .await
    }
}
