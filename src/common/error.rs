use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Registro não encontrado: {0}")]
    NotFound(String),

    #[error("Permissão necessária: {0}")]
    PermissionDenied(String),

    // O upstream respondeu, mas com erro. Guardamos status e corpo para o log.
    #[error("Upstream respondeu {status}: {message}")]
    Upstream { status: u16, message: String },

    // Falha de rede/transporte até a API de entidades.
    #[error("Falha ao chamar a API de entidades")]
    HttpClient(#[from] reqwest::Error),

    #[error("Resposta do upstream em formato inesperado")]
    Decode(#[from] serde_json::Error),

    // Variante genérica para qualquer outro erro inesperado.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::UserNotFound => (
                StatusCode::NOT_FOUND,
                "Usuário não encontrado.".to_string(),
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                format!("{} não encontrado.", what),
            ),
            AppError::PermissionDenied(slug) => (
                StatusCode::FORBIDDEN,
                format!("Você precisa da permissão '{}' para realizar esta ação.", slug),
            ),
            // 404 do upstream vira 404 nosso; o resto é gateway com problema.
            AppError::Upstream { status: 404, .. } => (
                StatusCode::NOT_FOUND,
                "Registro não encontrado no upstream.".to_string(),
            ),
            ref e @ AppError::Upstream { .. } | ref e @ AppError::HttpClient(_) => {
                tracing::error!("Erro no upstream: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "A API de entidades está indisponível.".to_string(),
                )
            }
            // Todos os outros erros viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
