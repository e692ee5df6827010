use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, RawQuery, State, multipart::MultipartRejection},
    http::{StatusCode, Uri, header::CONTENT_TYPE},
    response::IntoResponse,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::{
    error::{AppError, LOAD_PERSON_FAILED, LOAD_PERSONS_FAILED, SUBMIT_TIP_FAILED},
    state::RelayState,
    tip::TipSubmission,
};

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct TipReceipt {
    pub success: bool,
    pub message: &'static str,
    pub data: Value,
}

pub async fn filter_handler(
    State(state): State<Arc<RelayState>>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, AppError> {
    let body = state
        .upstream
        .filter(query.as_deref())
        .await
        .map_err(AppError::upstream(LOAD_PERSONS_FAILED))?;

    Ok(relayed(body))
}

pub async fn person_handler(
    State(state): State<Arc<RelayState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = id.parse().map_err(|_| AppError::InvalidField("id"))?;

    let body = state
        .upstream
        .person(id)
        .await
        .map_err(AppError::upstream(LOAD_PERSON_FAILED))?;

    Ok(relayed(body))
}

pub async fn tip_handler(
    State(state): State<Arc<RelayState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let multipart = multipart.map_err(|e| AppError::Upload(e.body_text()))?;
    let tip = TipSubmission::from_multipart(multipart).await?;

    info!(
        "Forwarding tip for occurrence {} (photo: {})",
        tip.oco_id,
        tip.foto.is_some()
    );

    let body = state
        .upstream
        .submit_tip(tip)
        .await
        .map_err(AppError::upstream(SUBMIT_TIP_FAILED))?;

    Ok(Json(TipReceipt {
        success: true,
        message: "Informações enviadas com sucesso",
        data: upstream_payload(&body),
    }))
}

pub async fn health_handler() -> impl IntoResponse {
    Json(Health {
        status: "OK",
        message: "Backend proxy server is running",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub async fn fallback_handler(uri: Uri) -> AppError {
    AppError::NotFound(uri.to_string())
}

fn relayed(body: Bytes) -> impl IntoResponse {
    (StatusCode::OK, [(CONTENT_TYPE, "application/json")], body)
}

/// The tip endpoint may answer with JSON, plain text or nothing at all.
pub fn upstream_payload(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }

    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::upstream_payload;

    #[test]
    fn test_empty_payload() {
        assert_eq!(upstream_payload(b""), Value::Null);
        assert_eq!(upstream_payload(b" \n"), Value::Null);
    }

    #[test]
    fn test_json_payload() {
        assert_eq!(
            upstream_payload(br#"{"id": 3, "ocoId": 42}"#),
            json!({"id": 3, "ocoId": 42})
        );
    }

    #[test]
    fn test_text_payload() {
        assert_eq!(
            upstream_payload(b"Informacao registrada"),
            Value::String("Informacao registrada".to_string())
        );
    }
}
