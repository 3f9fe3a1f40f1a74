//! Handler for the link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::debug;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the short URL for a long URL, creating the link if needed.
///
/// # Endpoint
///
/// `POST /shorten` (behind the rate limiter)
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/page", "expiresAt": "2030-01-01T00:00:00Z" }
/// ```
///
/// `expiresAt` is optional and only applies when a new link is created.
///
/// # Response
///
/// ```json
/// { "shortUrl": "http://localhost:3000/abc123" }
/// ```
///
/// Submitting an already shortened URL returns the existing short URL.
///
/// # Errors
///
/// Returns 400 Bad Request for a missing, malformed or non-web URL.
/// Returns 500 Internal Server Error on storage failures.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected shorten body");
        AppError::invalid_input("Please enter a valid URL.")
    })?;

    payload.validate()?;

    let link = state
        .link_service
        .shorten(&payload.url, payload.expires_at)
        .await?;

    Ok(Json(ShortenResponse {
        short_url: state.link_service.short_url(&link.short_code),
    }))
}
