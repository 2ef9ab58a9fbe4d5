// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::common;
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::get_me,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::list_form_names,
        handlers::leads::export_leads,
        handlers::leads::create_lead,
        handlers::leads::update_lead,
        handlers::leads::delete_lead,
        handlers::leads::bulk_mark_contacted,
        handlers::leads::bulk_assign,
        handlers::leads::bulk_unassign,
        handlers::leads::bulk_delete,
        handlers::leads::sync_facebook,

        // --- Saved Filters ---
        handlers::saved_filters::list_saved_filters,
        handlers::saved_filters::create_saved_filter,
        handlers::saved_filters::update_saved_filter,
        handlers::saved_filters::delete_saved_filter,

        // --- Settings ---
        handlers::settings::get_auto_assign,
        handlers::settings::update_auto_assign,

        // --- Directory ---
        handlers::directory::dashboard_users,
        handlers::directory::departments,
        handlers::directory::facebook_pages,
    ),
    components(
        schemas(
            // --- Leads ---
            models::lead::Lead,
            models::lead::LeadStatus,
            models::lead::ContactStatus,
            models::lead::LeadSource,
            services::lead_page::Page<models::lead::Lead>,

            // --- Filtros ---
            models::filters::AdvancedFilters,
            models::filters::AssignmentFilter,
            models::filters::DateFilter,
            models::filters::SortField,
            models::filters::SortDirection,
            models::filters::LeadQuery,
            models::filters::SavedFilter,

            // --- Auth ---
            models::auth::CurrentUser,
            models::auth::MeResponse,

            // --- Settings ---
            models::settings::AutoAssignStatus,
            models::settings::UpdateAutoAssignPayload,

            // --- Directory ---
            models::directory::DashboardUser,
            models::directory::DashboardDirectory,
            models::directory::Department,
            models::directory::FacebookPageConnection,

            // --- Atividades e lotes ---
            models::activity::ActivityKind,
            common::batch::BatchReport,
            common::batch::BatchFailure,

            // --- Payloads ---
            handlers::leads::CreateLeadPayload,
            handlers::leads::UpdateLeadPayload,
            handlers::leads::BulkActionPayload,
            handlers::leads::BulkAssignPayload,
            handlers::saved_filters::SavedFilterPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Viewer autenticado e capacidades"),
        (name = "Leads", description = "Listagem, exportação e ações em lote"),
        (name = "SavedFilters", description = "Combinações de filtros avançados salvas"),
        (name = "Settings", description = "Pausa da auto-atribuição"),
        (name = "Directory", description = "Usuários, departamentos e páginas conectadas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_bearer",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
