//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`          - Landing page (`<static_dir>/index.html`)
//! - `POST /shorten`   - Create or reuse a short link (rate limited)
//! - `GET  /{code}`    - Short link redirect
//! - `GET  /api/urls`  - Dashboard listing
//! - `GET  /health`    - Health check: database and click queue
//! - `/static/*`       - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-client sliding window on `POST /shorten`

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{Router, middleware};
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `static_dir` - directory holding `index.html` and its assets
pub fn app_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let static_dir = static_dir.as_ref();

    let shorten_router = Router::new()
        .route("/shorten", post(shorten_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::layer,
        ));

    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .merge(shorten_router)
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api::routes::api_routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(tracing::layer())
}
