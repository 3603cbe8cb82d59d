use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failures at the StarLine vendor boundary.
#[derive(Debug, Error)]
pub enum StarlineError {
    /// The vendor answered with `state != 1`. Carries the raw response body.
    #[error("vendor rejected request: {0}")]
    Vendor(serde_json::Value),

    /// Session auth failed or returned no cookie / user id.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Device data could not be fetched, including a 401 after re-authentication.
    #[error("device data fetch failed: {0}")]
    Fetch(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl StarlineError {
    /// Raw vendor payload, if the vendor itself rejected the request.
    pub fn vendor_payload(&self) -> Option<&serde_json::Value> {
        match self {
            StarlineError::Vendor(payload) => Some(payload),
            _ => None,
        }
    }
}

/// Errors surfaced by the dashboard HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, msg) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", "not found".to_string()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_server_error",
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": msg,
                "code": code,
            }
        }));

        (status, body).into_response()
    }
}
