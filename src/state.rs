//! Shared application state injected into every handler.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::LinkService;
use crate::domain::click_event::ClickEvent;
use crate::domain::rate_limiter::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` when identifying clients.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        rate_limiter: Arc<RateLimiter>,
        click_sender: mpsc::Sender<ClickEvent>,
        behind_proxy: bool,
    ) -> Self {
        Self {
            link_service,
            rate_limiter,
            click_sender,
            behind_proxy,
        }
    }
}
