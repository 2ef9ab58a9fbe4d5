// src/handlers/saved_filters.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::filters::{AdvancedFilters, SavedFilter},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SavedFilterPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,

    #[serde(default)]
    pub criteria: AdvancedFilters,

    #[serde(default)]
    pub is_global: bool,
}

// GET /api/saved-filters
#[utoipa::path(
    get,
    path = "/api/saved-filters",
    tag = "SavedFilters",
    responses(
        (status = 200, description = "Filtros do viewer e filtros globais", body = Vec<SavedFilter>)
    ),
    security(("api_bearer" = []))
)]
pub async fn list_saved_filters(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let filters = app_state.saved_filter_service.list_for(&user.0).await?;
    Ok((StatusCode::OK, Json(filters)))
}

// POST /api/saved-filters
#[utoipa::path(
    post,
    path = "/api/saved-filters",
    tag = "SavedFilters",
    request_body = SavedFilterPayload,
    responses(
        (status = 201, description = "Filtro salvo criado", body = SavedFilter),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_bearer" = []))
)]
pub async fn create_saved_filter(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<SavedFilterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let filter = app_state
        .saved_filter_service
        .create(&user.0, &payload.name, payload.criteria, payload.is_global)
        .await?;
    Ok((StatusCode::CREATED, Json(filter)))
}

// PUT /api/saved-filters/{id}
#[utoipa::path(
    put,
    path = "/api/saved-filters/{id}",
    tag = "SavedFilters",
    request_body = SavedFilterPayload,
    responses(
        (status = 204, description = "Filtro salvo atualizado"),
        (status = 403, description = "Só o dono ou admin")
    ),
    security(("api_bearer" = []))
)]
pub async fn update_saved_filter(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<SavedFilterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state
        .saved_filter_service
        .update(&user.0, &id, &payload.name, payload.criteria, payload.is_global)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/saved-filters/{id}
#[utoipa::path(
    delete,
    path = "/api/saved-filters/{id}",
    tag = "SavedFilters",
    responses(
        (status = 204, description = "Filtro salvo removido"),
        (status = 403, description = "Só o dono ou admin")
    ),
    security(("api_bearer" = []))
)]
pub async fn delete_saved_filter(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.saved_filter_service.delete(&user.0, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
