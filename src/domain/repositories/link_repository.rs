//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the link store.
///
/// Every method may fail with [`AppError::Storage`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by its exact original URL.
    ///
    /// Used to return an existing mapping instead of creating a duplicate.
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its exact short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Inserts a new link with `click_count = 0` and `created_at = now`.
    ///
    /// If a link for the same original URL was inserted concurrently, that link is
    /// returned instead (first writer wins).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if the short code is already taken.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Atomically increments the click counter of a link by one.
    ///
    /// An unknown code is not an error.
    async fn increment_clicks(&self, code: &str) -> Result<(), AppError>;

    /// Lists every link, most recently created first.
    async fn list_all(&self) -> Result<Vec<Link>, AppError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
