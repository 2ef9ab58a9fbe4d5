// src/models/directory.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// Membro da equipe, referenciado por e-mail em atribuições e filtros.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardUser {
    pub id: Option<String>,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub department_id: Option<String>,
    #[serde(default)]
    pub active: bool,
}

/// Retorno da função upstream `getDashboardUsers`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardDirectory {
    #[serde(default)]
    pub users: Vec<DashboardUser>,
    // Convites pendentes; repassados como vieram.
    #[serde(default)]
    pub invitations: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Department {
    pub id: String,
    pub name: String,
}

// Página do Facebook conectada; alimenta as opções do filtro de página.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FacebookPageConnection {
    pub id: String,
    pub page_id: Option<String>,
    pub page_name: Option<String>,
    #[serde(default)]
    pub active: bool,
}
