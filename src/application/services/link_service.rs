//! Link creation, resolution and listing service.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code, is_reserved};
use crate::utils::url_validator::validate_web_url;

/// Attempts at finding a free short code before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Default bound on a single store operation.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Codes longer than this are rejected without touching storage.
const MAX_LOOKUP_CODE_LENGTH: usize = 64;

/// Service for creating, resolving and listing short links.
///
/// Every store call is bounded by `storage_timeout`; an elapsed timeout is
/// reported as [`AppError::Storage`].
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    base_url: String,
    code_length: usize,
    storage_timeout: Duration,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` is the public prefix of returned short links; a trailing slash
    /// is ignored.
    pub fn new(repository: Arc<dyn LinkRepository>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            repository,
            base_url,
            code_length: DEFAULT_CODE_LENGTH,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    pub fn with_code_length(mut self, code_length: usize) -> Self {
        self.code_length = code_length;
        self
    }

    pub fn with_storage_timeout(mut self, storage_timeout: Duration) -> Self {
        self.storage_timeout = storage_timeout;
        self
    }

    /// Returns the link for `original_url`, creating it if needed.
    ///
    /// # Deduplication
    ///
    /// If the exact URL was already shortened, the existing link is returned
    /// unchanged (including its expiry) and nothing is written.
    ///
    /// # Code Generation
    ///
    /// Generates a random code and inserts it. On a code collision the code is
    /// regenerated, up to [`MAX_CODE_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if the URL is not an absolute web URL
    /// or `expires_at` is not in the future.
    /// Returns [`AppError::Storage`] on store failures or when no free code was
    /// found.
    pub async fn shorten(
        &self,
        original_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        validate_web_url(original_url).map_err(|e| {
            debug!(reason = %e, "Rejected URL");
            AppError::invalid_input("Please enter a valid URL.")
        })?;

        if let Some(expires_at) = expires_at
            && expires_at <= Utc::now()
        {
            return Err(AppError::invalid_input("Expiry must be in the future."));
        }

        if let Some(existing) = self
            .timed(self.repository.find_by_original_url(original_url))
            .await?
        {
            debug!(code = %existing.short_code, "URL already shortened");
            return Ok(existing);
        }

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let short_code = generate_code(self.code_length);
            if is_reserved(&short_code) {
                continue;
            }

            let new_link = NewLink {
                original_url: original_url.to_string(),
                short_code,
                expires_at,
            };

            match self.timed(self.repository.insert(new_link)).await {
                Ok(link) => {
                    metrics::counter!("shortify_links_created_total").increment(1);
                    info!(code = %link.short_code, url = %link.original_url, "Shortened URL");
                    return Ok(link);
                }
                Err(AppError::DuplicateCode) => {
                    warn!(attempt, "Short code collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::storage(format!(
            "no free short code after {MAX_CODE_ATTEMPTS} attempts"
        )))
    }

    /// Resolves a short code to a live link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Expired`] if the link's expiry has passed.
    /// Returns [`AppError::Storage`] on store failures.
    pub async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        if code.is_empty() || code.len() > MAX_LOOKUP_CODE_LENGTH {
            return Err(AppError::NotFound);
        }

        let link = self
            .timed(self.repository.find_by_code(code))
            .await?
            .ok_or(AppError::NotFound)?;

        if link.is_expired() {
            return Err(AppError::Expired);
        }

        Ok(link)
    }

    /// Lists every link, most recent first.
    pub async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        self.timed(self.repository.list_all()).await
    }

    /// Checks store connectivity.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.timed(self.repository.ping()).await
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    async fn timed<T, F>(&self, operation: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        tokio::time::timeout(self.storage_timeout, operation)
            .await
            .map_err(|_| {
                AppError::storage(format!(
                    "storage operation timed out after {:?}",
                    self.storage_timeout
                ))
            })?
    }
}
