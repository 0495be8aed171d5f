//! Error types for program discovery
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Discovery Error Enum ==
/// Unified error type for gateways, stores and the development backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiscoveryError {
    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// No session, or the session was rejected
    #[error("Not authenticated: {0}")]
    Authentication(String),

    /// Malformed input
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Transport failure or unexpected HTTP status
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a body we could not decode
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Durable client storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DiscoveryError {
    /// True when the failure means "no usable session".
    ///
    /// The shortlist treats this as an expected condition and falls back to
    /// local-only entries.
    pub fn is_authentication(&self) -> bool {
        matches!(self, DiscoveryError::Authentication(_))
    }

    /// HTTP status used when this error is served by the development backend.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DiscoveryError::NotFound(_) => StatusCode::NOT_FOUND,
            DiscoveryError::Authentication(_) => StatusCode::UNAUTHORIZED,
            DiscoveryError::Validation(_) => StatusCode::BAD_REQUEST,
            DiscoveryError::Network(_) | DiscoveryError::InvalidResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            DiscoveryError::Storage(_) | DiscoveryError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for DiscoveryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            DiscoveryError::NotFound(msg)
            | DiscoveryError::Authentication(msg)
            | DiscoveryError::Validation(msg)
            | DiscoveryError::Network(msg)
            | DiscoveryError::InvalidResponse(msg)
            | DiscoveryError::Storage(msg)
            | DiscoveryError::Internal(msg) => msg.clone(),
        };

        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<serde_json::Error> for DiscoveryError {
    fn from(err: serde_json::Error) -> Self {
        DiscoveryError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for DiscoveryError {
    fn from(err: std::io::Error) -> Self {
        DiscoveryError::Storage(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for program discovery.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
