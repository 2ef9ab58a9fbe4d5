// src/models/activity.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    StageChange,
    StatusChange,
    Assignment,
}

/// Linha de atividade gravada na entidade upstream `RELeadActivity` como
/// efeito colateral das ações em lote.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewLeadActivity {
    pub lead_id: String,
    pub activity_type: ActivityKind,
    pub message: String,
    pub performed_by: String,
}
