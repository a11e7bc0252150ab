//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting core and request errors to appropriate HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;
use training_tracker_shared::types::{ErrorDetail, ErrorResponse};
use training_tracker_shared::validation::get_field_display_label;
use training_tracker_shared::CoreError;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: None,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Configuration(msg) => ApiError::Configuration(msg),
            CoreError::Validation(msg) => ApiError::validation(msg),
        }
    }
}

/// Key the validator derive uses for struct-level (schema) errors
const SCHEMA_ERROR_KEY: &str = "__all__";

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let Some((key, errs)) = field_errors.iter().next() else {
            return ApiError::validation(errors.to_string());
        };

        let key = key.to_string();
        let explained = errs
            .iter()
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()));
        let field = (key != SCHEMA_ERROR_KEY).then(|| key.clone());
        let message = match (explained, &field) {
            (Some(msg), _) => msg,
            (None, Some(f)) => format!("{} is invalid", get_field_display_label(f)),
            (None, None) => errors.to_string(),
        };

        ApiError::Validation { message, field }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match self {
            ApiError::Validation { message, field } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                message,
                field,
            ),
            ApiError::Configuration(msg) => {
                (StatusCode::BAD_REQUEST, "CONFIGURATION_ERROR", msg, None)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
