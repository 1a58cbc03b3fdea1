//! services/api/src/error.rs
//!
//! Defines the primary error type for the GeoWatch service, and how port errors
//! are rendered as HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use geowatch_core::ports::PortError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

pub fn status_for(err: &PortError) -> StatusCode {
    match err {
        PortError::Validation(_) | PortError::WeakPassword => StatusCode::BAD_REQUEST,
        PortError::InvalidCredentials | PortError::Unauthorized => StatusCode::UNAUTHORIZED,
        PortError::NotFound(_) => StatusCode::NOT_FOUND,
        PortError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Port(err) => (
                status_for(&err),
                ErrorBody {
                    error: err.message(),
                    code: err.code().to_string(),
                },
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: other.to_string(),
                    code: "internal".to_string(),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
