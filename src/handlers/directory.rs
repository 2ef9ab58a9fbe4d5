// src/handlers/directory.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::directory::{DashboardDirectory, Department, FacebookPageConnection},
};

// GET /api/users/dashboard
#[utoipa::path(
    get,
    path = "/api/users/dashboard",
    tag = "Directory",
    responses(
        (status = 200, description = "Usuários do painel e convites pendentes", body = DashboardDirectory)
    ),
    security(("api_bearer" = []))
)]
pub async fn dashboard_users(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let directory = app_state.directory.dashboard_users().await?;
    Ok((StatusCode::OK, Json(directory)))
}

// GET /api/departments
#[utoipa::path(
    get,
    path = "/api/departments",
    tag = "Directory",
    responses(
        (status = 200, description = "Departamentos", body = Vec<Department>)
    ),
    security(("api_bearer" = []))
)]
pub async fn departments(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let departments = app_state.directory.departments().await?;
    Ok((StatusCode::OK, Json(departments)))
}

// GET /api/facebook/pages
#[utoipa::path(
    get,
    path = "/api/facebook/pages",
    tag = "Directory",
    responses(
        (status = 200, description = "Páginas do Facebook conectadas", body = Vec<FacebookPageConnection>)
    ),
    security(("api_bearer" = []))
)]
pub async fn facebook_pages(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let pages = app_state.directory.facebook_pages().await?;
    Ok((StatusCode::OK, Json(pages)))
}
