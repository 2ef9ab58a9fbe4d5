// src/models/filters.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{DeserializeOwned, Error as DeError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::lead::{ContactStatus, LeadSource, LeadStatus};

// --- FILTROS AVANÇADOS ---

// Critérios estruturados (antes um objeto solto no frontend).
// Convenção explícita: lista vazia = sem restrição naquela chave.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AdvancedFilters {
    pub stage: Vec<LeadStatus>,
    pub source: Vec<LeadSource>,
    pub assigned_to: Vec<String>,
}

impl AdvancedFilters {
    pub fn is_unconstrained(&self) -> bool {
        self.stage.is_empty() && self.source.is_empty() && self.assigned_to.is_empty()
    }
}

// --- MODOS DE FILTRO SIMPLES ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentFilter {
    #[default]
    All,
    MyLeads,
    Assigned,
    Unassigned,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Yesterday,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
    ThisMonth,
    Custom,
}

// --- ORDENAÇÃO ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    FormName,
    Status,
    ContactStatus,
    LeadSource,
    AssignedTo,
    Phone,
    Email,
    #[default]
    CreatedDate,
    NextFollowUp,
    LastContactDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

// --- CONTEXTO COMPLETO DA LISTAGEM ---

/// Tudo que a listagem aceita: filtros, ordenação e paginação.
/// Desserializável tanto da query string (GET /api/leads) quanto do corpo
/// JSON das ações em lote. Ausência e o sentinela "all" significam a mesma
/// coisa: sem restrição.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct LeadQuery {
    pub search: Option<String>,

    #[serde(deserialize_with = "all_or_value")]
    pub source: Option<LeadSource>,

    pub assignment: AssignmentFilter,

    #[serde(deserialize_with = "all_or_string")]
    pub member: Option<String>,

    #[serde(deserialize_with = "all_or_value")]
    pub status: Option<LeadStatus>,

    #[serde(deserialize_with = "all_or_value")]
    pub contact_status: Option<ContactStatus>,

    pub date_filter: DateFilter,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,

    #[serde(deserialize_with = "all_or_string")]
    pub fb_page: Option<String>,
    #[serde(deserialize_with = "all_or_string")]
    pub fb_form: Option<String>,

    #[serde(deserialize_with = "all_or_string")]
    pub form_name: Option<String>,

    // Id de um SavedFilter; os critérios dele sobrescrevem os adv_*.
    #[serde(deserialize_with = "all_or_string")]
    pub saved_filter: Option<String>,

    // Filtros avançados; na query string vêm separados por vírgula.
    #[serde(deserialize_with = "value_list")]
    pub adv_stage: Vec<LeadStatus>,
    #[serde(deserialize_with = "value_list")]
    pub adv_source: Vec<LeadSource>,
    #[serde(deserialize_with = "value_list")]
    pub adv_assigned: Vec<String>,

    pub sort_by: SortField,
    pub sort_dir: SortDirection,

    #[validate(range(min = 1, message = "invalid_page"))]
    pub page: u32,
    #[validate(custom(function = validate_page_size))]
    pub per_page: u32,
}

impl Default for LeadQuery {
    fn default() -> Self {
        Self {
            search: None,
            source: None,
            assignment: AssignmentFilter::All,
            member: None,
            status: None,
            contact_status: None,
            date_filter: DateFilter::All,
            date_start: None,
            date_end: None,
            fb_page: None,
            fb_form: None,
            form_name: None,
            saved_filter: None,
            adv_stage: Vec::new(),
            adv_source: Vec::new(),
            adv_assigned: Vec::new(),
            sort_by: SortField::CreatedDate,
            sort_dir: SortDirection::Desc,
            page: 1,
            per_page: 20,
        }
    }
}

impl LeadQuery {
    /// Carrega os critérios de um filtro salvo por cima do contexto atual.
    pub fn apply_saved(&mut self, criteria: &AdvancedFilters) {
        self.adv_stage = criteria.stage.clone();
        self.adv_source = criteria.source.clone();
        self.adv_assigned = criteria.assigned_to.clone();
    }
}

/// Tamanhos de página aceitos pela tabela.
pub const PAGE_SIZES: [u32; 4] = [20, 50, 100, 250];

fn validate_page_size(value: u32) -> Result<(), ValidationError> {
    if PAGE_SIZES.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::new("invalid_page_size"))
}

// --- FILTRO SALVO (entidade upstream) ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedFilter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub criteria: AdvancedFilters,
    pub created_by: Option<String>,
    #[serde(default)]
    pub is_global: bool,
    pub created_date: Option<DateTime<Utc>>,
}

// --- DESSERIALIZADORES ("all" e listas) ---

fn all_or_raw<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(s) => Some(s.to_string()),
    })
}

fn all_or_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    all_or_raw(deserializer)
}

fn all_or_value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match all_or_raw(deserializer)? {
        None => Ok(None),
        Some(s) => serde_json::from_value(Value::String(s))
            .map(Some)
            .map_err(DeError::custom),
    }
}

// Aceita tanto "new,contacted" (query string) quanto um array JSON (corpo).
fn value_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let mut out = Vec::new();
    match raw {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) => {
            for part in s.split(',') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                out.push(
                    serde_json::from_value(Value::String(part.to_string()))
                        .map_err(DeError::custom)?,
                );
            }
        }
        Some(Value::Array(items)) => {
            for item in items {
                out.push(serde_json::from_value(item).map_err(DeError::custom)?);
            }
        }
        Some(other) => {
            return Err(DeError::custom(format!(
                "lista de filtro inválida: {other}"
            )));
        }
    }
    Ok(out)
}
