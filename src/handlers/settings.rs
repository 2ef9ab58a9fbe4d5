// src/handlers/settings.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::settings::{AutoAssignStatus, UpdateAutoAssignPayload},
};

// GET /api/settings/auto-assign
#[utoipa::path(
    get,
    path = "/api/settings/auto-assign",
    tag = "Settings",
    responses(
        (status = 200, description = "Estado da pausa da auto-atribuição", body = AutoAssignStatus)
    ),
    security(("api_bearer" = []))
)]
pub async fn get_auto_assign(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let status = app_state.settings_service.auto_assign_status().await?;
    Ok((StatusCode::OK, Json(status)))
}

// PUT /api/settings/auto-assign
#[utoipa::path(
    put,
    path = "/api/settings/auto-assign",
    tag = "Settings",
    request_body = UpdateAutoAssignPayload,
    responses(
        (status = 200, description = "Flag atualizada na organização", body = AutoAssignStatus),
        (status = 403, description = "Somente admin")
    ),
    security(("api_bearer" = []))
)]
pub async fn update_auto_assign(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateAutoAssignPayload>,
) -> Result<impl IntoResponse, AppError> {
    if !user.0.is_admin() {
        return Err(AppError::PermissionDenied("settings:update".into()));
    }

    let status = app_state
        .settings_service
        .set_auto_assign_paused(payload.paused)
        .await?;
    Ok((StatusCode::OK, Json(status)))
}
