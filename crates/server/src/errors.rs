use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::subscription::SubscriptionError;
use thiserror::Error;
use tracing::{error, warn};

/// JSON error response: `{ "error": <status text>, "message": <detail> }`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, message: Option<String>) -> Self {
        Self { status, error: error.to_string(), message }
    }

    pub fn bad_request(error: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, Some(message.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.error, message: self.message };
        (self.status, Json(body)).into_response()
    }
}

/// HTTP status for a business error, chosen by variant.
pub fn status_for(e: &SubscriptionError) -> StatusCode {
    match e {
        SubscriptionError::NotFound => StatusCode::NOT_FOUND,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<SubscriptionError> for JsonApiError {
    fn from(e: SubscriptionError) -> Self {
        let status = status_for(&e);
        if status.is_server_error() {
            let source = std::error::Error::source(&e).map(|s| s.to_string());
            error!(code = e.code(), error = %e, source = ?source, "subscription request failed");
        } else {
            warn!(code = e.code(), error = %e, "subscription request rejected");
        }
        let text = status.canonical_reason().unwrap_or("Error");
        JsonApiError::new(status, text, Some(e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
