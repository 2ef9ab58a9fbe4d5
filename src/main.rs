//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;
mod upstream;
mod worker;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Worker de recarga periódica da coleção de leads.
    worker::spawn_lead_refresh(
        app_state.lead_service.clone(),
        app_state.refresh_interval,
    );

    // Define as rotas de usuário (protegidas pelo middleware)
    let auth_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let lead_routes = Router::new()
        .route("/"
               ,get(handlers::leads::list_leads)
               .post(handlers::leads::create_lead)
        )
        .route("/form-names"
               ,get(handlers::leads::list_form_names)
        )
        .route("/export"
               ,get(handlers::leads::export_leads)
        )
        .route("/sync-facebook"
               ,post(handlers::leads::sync_facebook)
        )
        // Ações em lote: o corpo traz a seleção e o contexto de filtro
        .route("/bulk/mark-contacted"
               ,post(handlers::leads::bulk_mark_contacted)
        )
        .route("/bulk/assign"
               ,post(handlers::leads::bulk_assign)
        )
        .route("/bulk/unassign"
               ,post(handlers::leads::bulk_unassign)
        )
        .route("/bulk/delete"
               ,post(handlers::leads::bulk_delete)
        )
        .route("/{id}"
               ,axum::routing::patch(handlers::leads::update_lead)
               .delete(handlers::leads::delete_lead)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let saved_filter_routes = Router::new()
        .route("/"
               ,get(handlers::saved_filters::list_saved_filters)
               .post(handlers::saved_filters::create_saved_filter)
        )
        .route("/{id}"
               ,axum::routing::put(handlers::saved_filters::update_saved_filter)
               .delete(handlers::saved_filters::delete_saved_filter)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let settings_routes = Router::new()
        .route("/auto-assign"
               ,get(handlers::settings::get_auto_assign)
               .put(handlers::settings::update_auto_assign)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let directory_routes = Router::new()
        .route("/users/dashboard", get(handlers::directory::dashboard_users))
        .route("/departments", get(handlers::directory::departments))
        .route("/facebook/pages", get(handlers::directory::facebook_pages))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/leads", lead_routes)
        .nest("/api/saved-filters", saved_filter_routes)
        .nest("/api/settings", settings_routes)
        .nest("/api", directory_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
