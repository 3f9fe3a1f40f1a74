//! Web URL validation.
//!
//! Accepts only absolute `http`/`https` URLs with a host, written entirely in
//! printable ASCII. The URL is never rewritten: what passes is stored and
//! redirected to byte for byte.

use url::Url;

/// Longest accepted URL, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons a candidate URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL is empty")]
    Empty,

    #[error("URL is longer than {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("URL contains whitespace or non-ASCII characters")]
    IllegalCharacters,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Checks that `input` is a well-formed absolute web URL.
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] that applies.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_web_url("https://example.com/page?q=1").is_ok());
/// assert!(validate_web_url("not-a-url").is_err());
/// assert!(validate_web_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_web_url(input: &str) -> Result<(), UrlValidationError> {
    if input.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    if !input.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(UrlValidationError::IllegalCharacters);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
