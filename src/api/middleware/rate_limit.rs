//! Per-client rate limiting middleware.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_id;

/// Rejects requests from clients that exhausted their budget.
///
/// Consults [`crate::domain::rate_limiter::RateLimiter::allow`] before the
/// handler (and before the body is parsed). Denied requests receive
/// `429 Too Many Requests` with a `Retry-After` header set to the window length.
///
/// # Key Extraction
///
/// See [`client_id`]: the peer socket address, or proxy headers when the
/// service runs behind a trusted reverse proxy.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit::layer));
/// ```
pub async fn layer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_id(request.headers(), peer, state.behind_proxy);

    if !state.rate_limiter.allow(&client) {
        metrics::counter!("shortify_rate_limited_total").increment(1);
        warn!(client = %client, "Rate limit exceeded");

        let mut response = AppError::RateLimited.into_response();
        response.headers_mut().insert(
            header::RETRY_AFTER,
            HeaderValue::from(state.rate_limiter.window().as_secs()),
        );
        return response;
    }

    next.run(request).await
}
