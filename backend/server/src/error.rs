use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const LOAD_PERSONS_FAILED: &str = "Erro ao carregar dados das pessoas desaparecidas";
pub const LOAD_PERSON_FAILED: &str = "Erro ao carregar dados da pessoa";
pub const SUBMIT_TIP_FAILED: &str = "Erro ao enviar informações";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Campos obrigatórios ausentes: {0}")]
    MissingFields(String),

    #[error("Valor inválido para {0}")]
    InvalidField(&'static str),

    #[error("O arquivo deve ter no máximo 5MB")]
    FileTooLarge,

    #[error("Apenas arquivos de imagem são permitidos")]
    InvalidFileType,

    #[error("{0}")]
    Upload(String),

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Rota não encontrada: {0}")]
    NotFound(String),
}

impl AppError {
    /// Wraps a failed upstream call with the message the browser shows for that route.
    ///
    /// The URL is stripped since tip queries carry the reporter's contact details.
    pub fn upstream(context: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Upstream {
            context,
            source: source.without_url(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFields { .. }
            | AppError::InvalidField { .. }
            | AppError::FileTooLarge
            | AppError::InvalidFileType
            | AppError::Upload { .. } => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::FileTooLarge
        } else {
            AppError::Upload(e.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::MissingFields(_) => json!({
                "error": "Campos obrigatórios não preenchidos",
                "message": self.to_string(),
            }),
            AppError::InvalidField(_) => json!({
                "error": "Campo inválido",
                "message": self.to_string(),
            }),
            AppError::FileTooLarge => json!({
                "error": "Arquivo muito grande",
                "message": self.to_string(),
            }),
            AppError::InvalidFileType => json!({
                "error": "Tipo de arquivo inválido",
                "message": self.to_string(),
            }),
            AppError::Upload(message) => json!({
                "error": "Erro no upload do arquivo",
                "message": message,
            }),
            AppError::Upstream { context, source } => {
                error!("{context}: {source}");

                json!({
                    "error": context,
                    "message": source.to_string(),
                })
            }
            AppError::NotFound(path) => json!({
                "error": "Rota não encontrada",
                "path": path,
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}
