//! Error handling for the PlotBot API
//!
//! Every failure a handler can produce is an [`ApiError`], rendered as a JSON
//! body of the form `{"code": ..., "detail": ...}` with the mapped status.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use plotbot_core::QueryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Data never loaded (500 Internal Server Error, not 503)
    #[error("{message}")]
    ServiceUnavailable { message: String },

    /// Unknown subject (404 Not Found)
    #[error("{message}")]
    NotFound { message: String },

    /// Unexpected fault while handling a request (500 Internal Server Error).
    /// The fault text is passed through to the client.
    #[error("An internal error occurred: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ServiceUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> ApiErrorResponse {
        ApiErrorResponse { code: self.error_code().to_string(), detail: self.to_string() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}

/// JSON error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Machine-readable error code
    #[schema(example = "NOT_FOUND")]
    pub code: String,

    /// Human-readable description
    #[schema(example = "Subject 'Art' not found.")]
    pub detail: String,
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::DataUnavailable => {
                ApiError::ServiceUnavailable { message: err.to_string() }
            }
            QueryError::SubjectNotFound { .. } => ApiError::NotFound { message: err.to_string() },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Panic handler for `CatchPanicLayer`: a panicking handler becomes a 500
/// carrying the panic message.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(panic = %message, "Request handler panicked");
    ApiError::internal(message).into_response()
}
