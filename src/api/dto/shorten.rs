//! DTOs for the shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The original URL (absolute http/https, at most 2048 bytes).
    #[serde(default)]
    #[validate(length(min = 1, max = 2048, message = "Please enter a valid URL."))]
    pub url: String,

    /// Optional expiry. After this time the link answers 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
}
