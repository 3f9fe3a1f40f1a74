//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::domain::click_event::ClickEvent;
use crate::domain::click_worker::enqueue_click;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look up the link by code
/// 2. Refuse expired links
/// 3. Build the 302 Found response
/// 4. Queue a click event for the background worker (dropped if the queue is full)
///
/// The click is counted asynchronously; its outcome never changes the response.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 410 Gone if the link has expired (no click is counted).
/// Returns 500 Internal Server Error on storage failures.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    let link = state.link_service.resolve(&code).await?;

    let location = HeaderValue::from_str(&link.original_url)
        .map_err(|_| AppError::storage(format!("stored URL for {code} is not a valid header")))?;

    let response = (StatusCode::FOUND, [(header::LOCATION, location)]).into_response();

    metrics::counter!("shortify_redirects_total").increment(1);
    enqueue_click(&state.click_sender, ClickEvent::new(link.short_code));

    Ok(response)
}
