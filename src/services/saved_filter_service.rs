// src/services/saved_filter_service.rs

use serde_json::json;

use crate::{
    common::error::AppError,
    models::{
        auth::CurrentUser,
        filters::{AdvancedFilters, SavedFilter},
    },
    upstream::SavedFilterRepository,
};

#[derive(Clone)]
pub struct SavedFilterService {
    repo: SavedFilterRepository,
}

impl SavedFilterService {
    pub fn new(repo: SavedFilterRepository) -> Self {
        Self { repo }
    }

    /// Filtros visíveis para o viewer: os próprios e os globais.
    pub async fn list_for(&self, viewer: &CurrentUser) -> Result<Vec<SavedFilter>, AppError> {
        let filters = self.repo.list().await?;
        Ok(filters
            .into_iter()
            .filter(|f| f.is_global || f.created_by.as_deref() == Some(viewer.email.as_str()))
            .collect())
    }

    /// Resolve um filtro salvo respeitando a visibilidade (dono ou global).
    /// É o caminho usado quando a listagem recebe `saved_filter=<id>`.
    pub async fn resolve(&self, viewer: &CurrentUser, id: &str) -> Result<SavedFilter, AppError> {
        let filter = self.repo.get(id).await?;
        if filter.is_global
            || viewer.is_admin()
            || filter.created_by.as_deref() == Some(viewer.email.as_str())
        {
            return Ok(filter);
        }
        Err(AppError::PermissionDenied("saved_filters:read".into()))
    }

    pub async fn create(
        &self,
        viewer: &CurrentUser,
        name: &str,
        criteria: AdvancedFilters,
        is_global: bool,
    ) -> Result<SavedFilter, AppError> {
        self.ensure_constrained(&criteria)?;
        let record = json!({
            "name": name,
            "criteria": criteria,
            "created_by": viewer.email,
            "is_global": is_global,
        });
        self.repo.create(record).await
    }

    pub async fn update(
        &self,
        viewer: &CurrentUser,
        id: &str,
        name: &str,
        criteria: AdvancedFilters,
        is_global: bool,
    ) -> Result<(), AppError> {
        self.ensure_constrained(&criteria)?;
        let existing = self.repo.get(id).await?;
        self.ensure_owner(viewer, &existing)?;
        let patch = json!({
            "name": name,
            "criteria": criteria,
            "is_global": is_global,
        });
        self.repo.update(id, patch).await
    }

    pub async fn delete(&self, viewer: &CurrentUser, id: &str) -> Result<(), AppError> {
        let existing = self.repo.get(id).await?;
        self.ensure_owner(viewer, &existing)?;
        self.repo.delete(id).await
    }

    // Só o dono (ou um admin) mexe num filtro salvo.
    fn ensure_owner(&self, viewer: &CurrentUser, filter: &SavedFilter) -> Result<(), AppError> {
        if viewer.is_admin() || filter.created_by.as_deref() == Some(viewer.email.as_str()) {
            return Ok(());
        }
        Err(AppError::PermissionDenied("saved_filters:manage".into()))
    }

    // Um filtro salvo sem nenhum critério não serve para nada.
    fn ensure_constrained(&self, criteria: &AdvancedFilters) -> Result<(), AppError> {
        if !criteria.is_unconstrained() {
            return Ok(());
        }
        let mut errors = validator::ValidationErrors::new();
        errors.add("criteria", validator::ValidationError::new("empty_criteria"));
        Err(AppError::ValidationError(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::{EntityClient, EntityTransport, UpstreamRequest};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;

    struct FilterTransport;

    #[async_trait]
    impl EntityTransport for FilterTransport {
        async fn execute(&self, request: UpstreamRequest) -> Result<Value, AppError> {
            match (request.method.as_str(), request.path.as_str()) {
                ("GET", "/entities/SavedFilter") => Ok(json!([
                    {"id": "f1", "name": "meus novos", "created_by": "a@x.com", "is_global": false},
                    {"id": "f2", "name": "time todo", "created_by": "b@x.com", "is_global": true},
                    {"id": "f3", "name": "privado de b", "created_by": "b@x.com", "is_global": false},
                ])),
                ("GET", "/entities/SavedFilter/f3") => Ok(json!(
                    {"id": "f3", "name": "privado de b", "created_by": "b@x.com", "is_global": false}
                )),
                other => panic!("requisição inesperada: {other:?}"),
            }
        }
    }

    fn viewer(email: &str) -> CurrentUser {
        CurrentUser {
            id: None,
            email: email.into(),
            full_name: None,
            role: Some("user".into()),
            permissions: vec![],
        }
    }

    #[tokio::test]
    async fn listing_returns_own_and_global_filters() {
        let service = SavedFilterService::new(SavedFilterRepository::new(EntityClient::new(
            Arc::new(FilterTransport),
        )));
        let filters = service.list_for(&viewer("a@x.com")).await.unwrap();
        let ids: Vec<&str> = filters.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f1", "f2"]);
    }

    #[tokio::test]
    async fn resolve_honors_visibility() {
        let service = SavedFilterService::new(SavedFilterRepository::new(EntityClient::new(
            Arc::new(FilterTransport),
        )));
        // f3 é privado de b@x.com: outro membro não aplica esse filtro.
        let err = service
            .resolve(&viewer("a@x.com"), "f3")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));
        assert!(service.resolve(&viewer("b@x.com"), "f3").await.is_ok());
    }

    #[tokio::test]
    async fn creating_an_unconstrained_filter_is_rejected() {
        let service = SavedFilterService::new(SavedFilterRepository::new(EntityClient::new(
            Arc::new(FilterTransport),
        )));
        let err = service
            .create(&viewer("a@x.com"), "vazio", AdvancedFilters::default(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn only_the_owner_or_admin_deletes() {
        let service = SavedFilterService::new(SavedFilterRepository::new(EntityClient::new(
            Arc::new(FilterTransport),
        )));
        let err = service
            .delete(&viewer("a@x.com"), "f3")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));
    }
}
