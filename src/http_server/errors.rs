//! # API Errors
//!
//! Failures of the student routes and their HTTP mapping.
//!
//! Create/update failures keep the status codes existing clients depend
//! on: a name collision is a 200 with `code: 1`, every other rejection is
//! a 500 with a negative code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::response::{CodeErrorResponse, FailureResponse};
use crate::student::ErrorKind;

/// Result type for route handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Student route failures
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Create/update rejected or failed
    #[error("{msg}")]
    Write { kind: ErrorKind, msg: String },

    /// Create/update body was not valid JSON of the expected shape
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Update target does not exist
    #[error("Student No.{0} does not exist, please check!")]
    UpdateNotFound(String),

    /// Delete target does not exist
    #[error("Student No.{0} does not exist, please check!")]
    DeleteNotFound(String),

    /// List parameters rejected
    #[error("{0}")]
    InvalidQuery(String),

    /// List/delete storage failure
    #[error("{0}")]
    Internal(String),
}

/// HTTP status and response `code` for a write failure kind
pub fn write_status(kind: ErrorKind) -> (StatusCode, i32) {
    match kind {
        ErrorKind::Duplicate => (StatusCode::OK, 1),
        ErrorKind::IdErr => (StatusCode::INTERNAL_SERVER_ERROR, -2),
        ErrorKind::PhoneErr => (StatusCode::INTERNAL_SERVER_ERROR, -3),
        ErrorKind::EmailErr => (StatusCode::INTERNAL_SERVER_ERROR, -4),
        ErrorKind::Error => (StatusCode::INTERNAL_SERVER_ERROR, -1),
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Write { kind, .. } => write_status(*kind).0,
            ApiError::InvalidBody(_) | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::UpdateNotFound(_) | ApiError::DeleteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Write { kind, msg } => {
                let body = CodeErrorResponse {
                    code: write_status(*kind).1,
                    kind: Some(kind.as_str()),
                    msg: msg.clone(),
                };
                (status, Json(body)).into_response()
            }
            ApiError::InvalidBody(_) => {
                let body = CodeErrorResponse {
                    code: -1,
                    kind: Some(ErrorKind::Error.as_str()),
                    msg: self.to_string(),
                };
                (status, Json(body)).into_response()
            }
            ApiError::UpdateNotFound(_) => {
                let body = CodeErrorResponse {
                    code: -1,
                    kind: None,
                    msg: self.to_string(),
                };
                (status, Json(body)).into_response()
            }
            ApiError::DeleteNotFound(_) | ApiError::InvalidQuery(_) | ApiError::Internal(_) => {
                (status, Json(FailureResponse::new(self.to_string()))).into_response()
            }
        }
    }
}
