//! API route configuration.

use crate::api::handlers::list_urls_handler;
use crate::state::AppState;
use axum::{Router, routing::get};

/// Read-only API consumed by the dashboard.
///
/// # Endpoints
///
/// - `GET /urls` - Every link, most recent first
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/urls", get(list_urls_handler))
}
