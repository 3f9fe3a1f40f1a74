//! Handler for the dashboard link listing.

use axum::{Json, extract::State};

use crate::api::dto::urls::{UrlItem, UrlListResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists every short link, most recently created first.
///
/// # Endpoint
///
/// `GET /api/urls`
///
/// # Response
///
/// ```json
/// {
///   "urls": [
///     {
///       "original_url": "https://example.com/page",
///       "short_code": "abc123",
///       "click_count": 1,
///       "expires_at": null,
///       "created_at": "2024-01-15T10:30:00Z"
///     }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 500 Internal Server Error on storage failures.
pub async fn list_urls_handler(
    State(state): State<AppState>,
) -> Result<Json<UrlListResponse>, AppError> {
    let links = state.link_service.list_all().await?;

    Ok(Json(UrlListResponse {
        urls: links.into_iter().map(UrlItem::from).collect(),
    }))
}
