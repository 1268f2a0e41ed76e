//! Gateway errors and their HTTP mapping.

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors surfaced to the client instead of an upstream response.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No backend is registered.
    #[error("no healthy backends available")]
    DispatchUnavailable,

    /// The single forwarding attempt failed (connect, timeout, DNS, reset).
    #[error("upstream request to {target} failed: {source}")]
    Forwarding {
        target: String,
        #[source]
        source: reqwest::Error,
    },
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::DispatchUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Forwarding { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            GatewayError::DispatchUnavailable => "dispatch_unavailable",
            GatewayError::Forwarding { .. } => "forwarding_failure",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "type": self.error_type(),
                "message": self.to_string(),
            }
        });

        (
            self.status_code(),
            [(header::CONTENT_TYPE, "application/json")],
            Body::from(body.to_string()),
        )
            .into_response()
    }
}
