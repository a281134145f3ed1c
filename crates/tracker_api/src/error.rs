//! HTTP error mapping.
//!
//! # Invariants
//! - Every error body is `{ "error": <message> }`.
//! - Validation and constraint failures are client errors (400).
//! - Missing rows are 404; everything else is 500 and logged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use std::fmt::{Display, Formatter};
use tracker_core::{RepoError, ValidationError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message) | Self::NotFound(message) | Self::Internal(message) => {
                message
            }
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status().as_u16(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::BadRequest(value.to_string())
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => err.into(),
            RepoError::NotFound { .. } => Self::NotFound(value.to_string()),
            RepoError::Db(ref err) if err.is_constraint_violation() => {
                Self::BadRequest(value.to_string())
            }
            RepoError::Db(_) | RepoError::InvalidData(_) => Self::Internal(value.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=http_error module=api status=error http_status={} error={}",
                status.as_u16(),
                self.message()
            );
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
