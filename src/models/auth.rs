// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Viewer resolvido pelo endpoint `me` do upstream a partir do bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    pub id: Option<String>,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
    // Slugs de capacidade no formato "recurso:ação" (ex.: "leads:assign").
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }

    /// Admin ignora a checagem; os demais precisam do slug exato.
    pub fn has_capability(&self, slug: &str) -> bool {
        self.is_admin() || self.permissions.iter().any(|p| p == slug)
    }

    /// Quem pode ver as caixas de seleção em lote: admin ou qualquer uma
    /// das capacidades de escrita sobre leads.
    pub fn can_bulk_select(&self) -> bool {
        self.is_admin()
            || ["leads:assign", "leads:update", "leads:delete"]
                .iter()
                .any(|slug| self.permissions.iter().any(|p| p == slug))
    }

    /// E-mail normalizado para comparação de posse de lead.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Resposta de GET /api/auth/me, com o gate de seleção já calculado.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: CurrentUser,
    pub can_bulk_select: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Option<&str>, perms: &[&str]) -> CurrentUser {
        CurrentUser {
            id: None,
            email: "a@x.com".into(),
            full_name: None,
            role: role.map(str::to_string),
            permissions: perms.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn admin_bypasses_capabilities() {
        let admin = user(Some("admin"), &[]);
        assert!(admin.has_capability("leads:delete"));
        assert!(admin.can_bulk_select());
    }

    #[test]
    fn member_needs_exact_slug() {
        let member = user(Some("user"), &["leads:assign"]);
        assert!(member.has_capability("leads:assign"));
        assert!(!member.has_capability("leads:delete"));
        assert!(member.can_bulk_select());

        let reader = user(Some("user"), &["leads:read"]);
        assert!(!reader.can_bulk_select());
    }
}
