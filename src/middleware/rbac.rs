// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, models::auth::CurrentUser};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// 2. O Extractor (Guardião)
/// Admin passa por qualquer checagem; os demais precisam carregar o slug
/// nas capacidades resolvidas pelo upstream.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .ok_or(AppError::InvalidToken)?;

        let required_perm = T::slug();
        if !user.has_capability(required_perm) {
            return Err(AppError::PermissionDenied(required_perm.to_string()));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermLeadsAssign;
impl PermissionDef for PermLeadsAssign {
    fn slug() -> &'static str {
        "leads:assign"
    }
}

pub struct PermLeadsUpdate;
impl PermissionDef for PermLeadsUpdate {
    fn slug() -> &'static str {
        "leads:update"
    }
}

pub struct PermLeadsDelete;
impl PermissionDef for PermLeadsDelete {
    fn slug() -> &'static str {
        "leads:delete"
    }
}
