//! DTOs for the link listing endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Link;

/// Every stored link, most recent first.
#[derive(Debug, Serialize)]
pub struct UrlListResponse {
    pub urls: Vec<UrlItem>,
}

#[derive(Debug, Serialize)]
pub struct UrlItem {
    pub original_url: String,
    pub short_code: String,
    pub click_count: i64,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for UrlItem {
    fn from(link: Link) -> Self {
        Self {
            original_url: link.original_url,
            short_code: link.short_code,
            click_count: link.click_count,
            expires_at: link.expires_at,
            created_at: link.created_at,
        }
    }
}
