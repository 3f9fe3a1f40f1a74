//! Application error taxonomy and HTTP mapping.
//!
//! Every error response has the shape `{"error": "<message>"}`. Storage failures
//! are logged with their detail and reported to the client with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use validator::ValidationErrors;

/// Name of the unique constraint on `urls.short_code`.
const SHORT_CODE_CONSTRAINT: &str = "urls_short_code_key";

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input; user-correctable.
    #[error("{0}")]
    InvalidInput(String),

    /// The client exceeded its request budget for the current window.
    #[error("Too many requests, please slow down.")]
    RateLimited,

    #[error("Short URL not found.")]
    NotFound,

    /// The code exists but its `expires_at` has passed.
    #[error("This link has expired.")]
    Expired,

    /// Underlying persistence failure. The detail never reaches the client.
    #[error("storage error: {0}")]
    Storage(String),

    /// A generated short code collided with an existing one.
    ///
    /// Internal only: [`crate::application::services::LinkService`] regenerates
    /// the code when it sees this.
    #[error("short code already exists")]
    DuplicateCode,
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn storage(detail: impl Into<String>) -> Self {
        Self::Storage(detail.into())
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Expired => StatusCode::GONE,
            AppError::Storage(_) | AppError::DuplicateCode => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Storage(_) | AppError::DuplicateCode => {
                "Something went wrong, please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
            && db.constraint() == Some(SHORT_CODE_CONSTRAINT)
        {
            return AppError::DuplicateCode;
        }

        AppError::Storage(e.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid input.".to_string());

        AppError::InvalidInput(message)
    }
}
