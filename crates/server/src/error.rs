use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use schema_chain::{ChainError, ChainToolError, MetadataError};

/// Well-known error codes returned by the API.
pub mod codes {
    /// Directory does not exist or cannot be read.
    pub const INVALID_DIRECTORY: &str = "INVALID_DIRECTORY";
    /// Directory exists but does not hold a valid alter chain.
    pub const INVALID_SCHEMA: &str = "INVALID_SCHEMA";
    /// Request body did not deserialize into the expected JSON.
    pub const MALFORMED_REQUEST: &str = "MALFORMED_REQUEST";
    /// The object being looked up is not tracked.
    pub const NOT_FOUND: &str = "NOT_FOUND";
}

/// Whose fault the error is: the caller's input, or this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorType {
    User,
    System,
}

/// Generic error JSON sent back whenever an API interaction fails.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error_code: &'static str,
    pub error_type: ErrorType,
    pub error_message: String,
}

impl ErrorBody {
    pub fn user(error_code: &'static str, message: impl Into<String>) -> Self {
        Self {
            error_code,
            error_type: ErrorType::User,
            error_message: message.into(),
        }
    }

    pub fn system(error_code: &'static str, message: impl Into<String>) -> Self {
        Self {
            error_code,
            error_type: ErrorType::System,
            error_message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.error_type {
            ErrorType::User => StatusCode::BAD_REQUEST,
            ErrorType::System => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Translate a core chain error into the API envelope. Every core error
    /// is deterministic and attributable to the submitted directory, so they
    /// are all user errors; the code distinguishes unreadable input from a
    /// structurally invalid chain.
    pub fn from_chain(err: &ChainToolError) -> Self {
        let code = match err {
            ChainToolError::Metadata(MetadataError::Io { .. }) => codes::INVALID_DIRECTORY,
            ChainToolError::Chain(ChainError::NotADirectory { .. }) => codes::INVALID_DIRECTORY,
            _ => codes::INVALID_SCHEMA,
        };
        Self::user(code, err.to_string())
    }
}

impl ErrorBody {
    /// Respond with a status other than the one implied by the error type.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for ErrorBody {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self)).into_response()
    }
}
