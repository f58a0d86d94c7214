//! Read-side catalog facade used by the HTTP handlers.

use async_trait::async_trait;

use super::RepositoryError;
use crate::catalog::{CatalogQuery, SearchPage};
use crate::domain::{ChangelogEntry, CompatibilityEntry, HealthEntry, Server, ServerId, Tool};

/// Everything the query handlers read.
///
/// Implemented by the SQLite store and by the in-memory mock catalog.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    async fn search(&self, query: &CatalogQuery) -> Result<SearchPage, RepositoryError>;

    /// Returns `Err(RepositoryError::NotFound)` for unknown ids and slugs.
    async fn server(&self, id_or_slug: &str) -> Result<Server, RepositoryError>;

    async fn tools(&self, server_id: ServerId) -> Result<Vec<Tool>, RepositoryError>;

    /// Newest first, at most `limit`.
    async fn health(&self, server_id: ServerId, limit: u32)
    -> Result<Vec<HealthEntry>, RepositoryError>;

    async fn changelog(&self, server_id: ServerId) -> Result<Vec<ChangelogEntry>, RepositoryError>;

    async fn compatibility(
        &self,
        server_id: ServerId,
    ) -> Result<Vec<CompatibilityEntry>, RepositoryError>;
}
