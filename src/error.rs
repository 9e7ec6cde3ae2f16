//! Error types for the PRO directory service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;
use crate::store::StoreError;

// == App Error Enum ==
/// Unified error type for request handling.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested PRO does not exist or was deleted
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid query parameters or request body
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The document store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A value could not be serialized for caching
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable code reported in the error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::Store(_) => "STORE_ERROR",
            AppError::Serialization(_) | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(msg) | AppError::InvalidRequest(msg) => msg.clone(),
            other => {
                // Backend details stay in the logs
                error!(error = %other, "request failed");
                "Internal server error".to_string()
            }
        };

        let body = Json(ErrorResponse::new(message, self.code()));
        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for request handling.
pub type Result<T> = std::result::Result<T, AppError>;
