// src/models/settings.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// A organização é um registro único no upstream; só nos interessa o bloco
// de settings com a pausa da auto-atribuição.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Organization {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub settings: OrgSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrgSettings {
    #[serde(default)]
    pub auto_assign_paused: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutoAssignStatus {
    pub auto_assign_paused: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAutoAssignPayload {
    pub paused: bool,
}
