// src/upstream/client.rs

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::common::error::AppError;
use crate::models::auth::CurrentUser;

// ---
// Transporte: a fronteira HTTP fica atrás de um trait para os testes
// poderem injetar um upstream em memória.
// ---

#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl UpstreamRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }
}

#[async_trait]
pub trait EntityTransport: Send + Sync {
    async fn execute(&self, request: UpstreamRequest) -> Result<Value, AppError>;
}

/// Transporte real: reqwest contra a API de entidades.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        // Sem barra final; os paths já começam com "/".
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl EntityTransport for HttpTransport {
    async fn execute(&self, request: UpstreamRequest) -> Result<Value, AppError> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self
            .http
            .request(request.method, url)
            .header("api_key", &self.api_key)
            .query(&request.query);

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

// ---
// Fachada CRUD genérica por nome de entidade (list / filter / get / create /
// update / delete), mais `invoke` para funções de servidor e `me` para auth.
// ---

#[derive(Clone)]
pub struct EntityClient {
    transport: Arc<dyn EntityTransport>,
}

impl EntityClient {
    pub fn new(transport: Arc<dyn EntityTransport>) -> Self {
        Self { transport }
    }

    pub async fn list<T: DeserializeOwned>(
        &self,
        entity: &str,
        sort: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<T>, AppError> {
        let mut request = UpstreamRequest::new(Method::GET, format!("/entities/{entity}"));
        if let Some(sort) = sort {
            request.query.push(("sort".into(), sort.into()));
        }
        if let Some(limit) = limit {
            request.query.push(("limit".into(), limit.to_string()));
        }
        let value = self.transport.execute(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn filter<T: DeserializeOwned>(
        &self,
        entity: &str,
        predicate: Value,
        sort: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<T>, AppError> {
        let mut request = UpstreamRequest::new(Method::POST, format!("/entities/{entity}/filter"));
        request.body = Some(serde_json::json!({
            "query": predicate,
            "sort": sort,
            "limit": limit,
        }));
        let value = self.transport.execute(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, entity: &str, id: &str) -> Result<T, AppError> {
        let request = UpstreamRequest::new(Method::GET, format!("/entities/{entity}/{id}"));
        let value = self.transport.execute(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn create<T: DeserializeOwned>(
        &self,
        entity: &str,
        record: Value,
    ) -> Result<T, AppError> {
        let mut request = UpstreamRequest::new(Method::POST, format!("/entities/{entity}"));
        request.body = Some(record);
        let value = self.transport.execute(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn update(&self, entity: &str, id: &str, patch: Value) -> Result<Value, AppError> {
        let mut request = UpstreamRequest::new(Method::PATCH, format!("/entities/{entity}/{id}"));
        request.body = Some(patch);
        self.transport.execute(request).await
    }

    pub async fn delete(&self, entity: &str, id: &str) -> Result<(), AppError> {
        let request = UpstreamRequest::new(Method::DELETE, format!("/entities/{entity}/{id}"));
        self.transport.execute(request).await?;
        Ok(())
    }

    /// Invoca uma função de servidor (ex.: `fetchFacebookLeads`).
    pub async fn invoke<T: DeserializeOwned>(
        &self,
        function: &str,
        payload: Value,
    ) -> Result<T, AppError> {
        let mut request = UpstreamRequest::new(Method::POST, format!("/functions/{function}"));
        request.body = Some(payload);
        let value = self.transport.execute(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Resolve o bearer token no usuário atual. Rejeição vira InvalidToken
    /// no guard de autenticação.
    pub async fn me(&self, bearer: &str) -> Result<CurrentUser, AppError> {
        let mut request = UpstreamRequest::new(Method::GET, "/auth/me");
        request.bearer = Some(bearer.to_string());
        let value = self.transport.execute(request).await?;
        Ok(serde_json::from_value(value)?)
    }
}
