//! Error types for the stats service

use serde::Serialize;
use stats_store::{ErrorKind, StoreError};
use thiserror::Error;
use warp::http::StatusCode;

/// Errors surfaced by HTTP handlers
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Store(e) => match e.kind() {
                ErrorKind::InvalidBatchSize | ErrorKind::InvalidValue | ErrorKind::SymbolTooLong => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ErrorKind::SymbolLimitReached => StatusCode::BAD_REQUEST,
                ErrorKind::SymbolNotFound => StatusCode::NOT_FOUND,
                ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable wire code
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Store(e) => e.kind().code(),
            ServiceError::BadRequest(_) => "BAD_REQUEST",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail { code: self.code().to_string(), message: self.to_string() },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

/// Error detail
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
