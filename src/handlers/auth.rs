// src/handlers/auth.rs

use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::auth::MeResponse,
};

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Viewer atual com as capacidades resolvidas", body = MeResponse),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_bearer" = []))
)]
pub async fn get_me(user: AuthenticatedUser) -> Result<impl IntoResponse, AppError> {
    let can_bulk_select = user.0.can_bulk_select();
    Ok((
        StatusCode::OK,
        Json(MeResponse {
            user: user.0,
            can_bulk_select,
        }),
    ))
}
