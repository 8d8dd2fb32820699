//! Error types for SquirrelStore
//!
//! Provides a unified error type for all operations, plus the mapping from
//! each error to the HTTP response it is reported as.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using SquirrelError
pub type Result<T> = std::result::Result<T, SquirrelError>;

/// Unified error type for SquirrelStore operations
#[derive(Debug, Error)]
pub enum SquirrelError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Squirrel {0} not found")]
    NotFound(u64),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No route for {0}")]
    UnknownPath(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SquirrelError {
    /// HTTP status this error is reported as
    pub fn status_code(&self) -> StatusCode {
        match self {
            SquirrelError::Validation(_) => StatusCode::BAD_REQUEST,
            SquirrelError::NotFound(_) | SquirrelError::UnknownPath(_) => StatusCode::NOT_FOUND,
            SquirrelError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            SquirrelError::Io(_)
            | SquirrelError::Storage(_)
            | SquirrelError::Serialization(_)
            | SquirrelError::Network(_)
            | SquirrelError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for SquirrelError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::warn!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}
