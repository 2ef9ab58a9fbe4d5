// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- ENUMS ---

// Funil de vendas. A ordem dos estágios importa: `rank()` é a tabela
// explícita usada pela ordenação (e não a ordem alfabética dos valores).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Screening,
    Qualified,
    Proposal,
    Negotiation,
    SiteVisit,
    Agreement,
    Payment,
    ClosedWon,
    Lost,
}

impl LeadStatus {
    /// Posição no funil. `Lost` é terminal e fica depois de tudo.
    pub fn rank(self) -> u8 {
        match self {
            LeadStatus::New => 0,
            LeadStatus::Contacted => 1,
            LeadStatus::Screening => 2,
            LeadStatus::Qualified => 3,
            LeadStatus::Proposal => 4,
            LeadStatus::Negotiation => 5,
            LeadStatus::SiteVisit => 6,
            LeadStatus::Agreement => 7,
            LeadStatus::Payment => 8,
            LeadStatus::ClosedWon => 9,
            LeadStatus::Lost => 10,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Screening => "screening",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Proposal => "proposal",
            LeadStatus::Negotiation => "negotiation",
            LeadStatus::SiteVisit => "site_visit",
            LeadStatus::Agreement => "agreement",
            LeadStatus::Payment => "payment",
            LeadStatus::ClosedWon => "closed_won",
            LeadStatus::Lost => "lost",
        }
    }
}

// Status de contato, independente do estágio do funil.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    NotContacted,
    Contacted,
    NotInterested,
    NotPicked,
    SwitchedOff,
    Connected,
    FollowUp,
    WrongNumber,
    OutOfNetwork,
}

impl ContactStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactStatus::NotContacted => "not_contacted",
            ContactStatus::Contacted => "contacted",
            ContactStatus::NotInterested => "not_interested",
            ContactStatus::NotPicked => "not_picked",
            ContactStatus::SwitchedOff => "switched_off",
            ContactStatus::Connected => "connected",
            ContactStatus::FollowUp => "follow_up",
            ContactStatus::WrongNumber => "wrong_number",
            ContactStatus::OutOfNetwork => "out_of_network",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Walkin,
    Call,
    Referral,
    Website,
    Facebook,
    Instagram,
    Whatsapp,
}

impl LeadSource {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadSource::Walkin => "walkin",
            LeadSource::Call => "call",
            LeadSource::Referral => "referral",
            LeadSource::Website => "website",
            LeadSource::Facebook => "facebook",
            LeadSource::Instagram => "instagram",
            LeadSource::Whatsapp => "whatsapp",
        }
    }
}

// --- LEAD (O Dado) ---

// Espelha o JSON da entidade upstream. Os nomes dos campos seguem o
// esquema da API de entidades, por isso sem rename_all aqui.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Lead {
    pub id: String,

    // O nome de exibição prefere `lead_name` e cai para `name`.
    pub lead_name: Option<String>,
    pub name: Option<String>,

    pub phone: Option<String>,
    pub email: Option<String>,

    pub status: LeadStatus,
    pub contact_status: Option<ContactStatus>,
    pub lead_source: Option<LeadSource>,

    pub assigned_to: Option<String>,

    // Texto livre; pode embutir os marcadores "Form Name: <x>" / "Form: <x>"
    // e "Page ID: <x>" usados pelos filtros derivados.
    pub notes: Option<String>,

    // Presentes apenas em leads vindos do Facebook.
    pub fb_page_id: Option<String>,
    pub fb_form_id: Option<String>,
    pub fb_created_time: Option<DateTime<Utc>>,

    pub next_follow_up: Option<DateTime<Utc>>,
    pub last_contact_date: Option<DateTime<Utc>>,
    pub created_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub is_cold: bool,

    pub location: Option<String>,
    pub budget: Option<String>,
    pub requirements: Option<String>,
    pub timeline: Option<String>,
}

/// Valor-sentinela para leads sem nome de formulário derivável.
pub const FORM_NAME_SENTINEL: &str = "-";

impl Lead {
    pub fn display_name(&self) -> &str {
        self.lead_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("")
    }

    pub fn form_name(&self) -> String {
        derive_form_name(self.notes.as_deref())
    }

    /// Data usada pelo filtro de período: `fb_created_time` quando existe,
    /// senão `created_date`.
    pub fn reference_date(&self) -> Option<DateTime<Utc>> {
        self.fb_created_time.or(self.created_date)
    }
}

/// Extrai o nome do formulário das notas: primeiro marcador "Form Name:",
/// depois "Form:"; o valor vai até o fim da linha, com espaços aparados.
/// Sem marcador (ou valor vazio) o resultado é o sentinela "-".
pub fn derive_form_name(notes: Option<&str>) -> String {
    let Some(notes) = notes else {
        return FORM_NAME_SENTINEL.to_string();
    };

    for marker in ["Form Name:", "Form:"] {
        if let Some(pos) = notes.find(marker) {
            let rest = &notes[pos + marker.len()..];
            let value = rest.lines().next().unwrap_or("").trim();
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }

    FORM_NAME_SENTINEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_name_prefers_long_marker() {
        let notes = Some("Imported.\nForm Name: Summer Campaign\nPage ID: 99");
        assert_eq!(derive_form_name(notes), "Summer Campaign");
    }

    #[test]
    fn form_name_falls_back_to_short_marker() {
        assert_eq!(derive_form_name(Some("Form: Walk-in desk")), "Walk-in desk");
    }

    #[test]
    fn form_name_without_marker_is_sentinel() {
        assert_eq!(derive_form_name(Some("chamou no whatsapp")), "-");
        assert_eq!(derive_form_name(None), "-");
        assert_eq!(derive_form_name(Some("Form:   ")), "-");
    }

    #[test]
    fn form_name_is_idempotent() {
        let notes = Some("Form Name: Launch 2026");
        let first = derive_form_name(notes);
        assert_eq!(derive_form_name(notes), first);
    }

    #[test]
    fn status_wire_values_are_snake_case() {
        let v = serde_json::to_value(LeadStatus::SiteVisit).unwrap();
        assert_eq!(v, serde_json::json!("site_visit"));
        let back: LeadStatus = serde_json::from_value(v).unwrap();
        assert_eq!(back, LeadStatus::SiteVisit);
    }
}
