//! Catalog store repositories.
//!
//! Implementations must handle all storage details internally.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::catalog::{CatalogQuery, SearchPage};
use crate::domain::{
    ChangelogEntry, CompatibilityEntry, DetectionSource, HealthEntry, HealthStatus, RepoStats,
    Server, ServerId, Tool,
};

/// Whether an upsert created a row or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Server rows.
#[async_trait]
pub trait ServerRepository: Send + Sync {
    /// Insert or update keyed by the deterministic id.
    ///
    /// On update, health, repository statistics other than stars, and the
    /// detection state are left untouched.
    async fn upsert(&self, server: &Server) -> Result<UpsertOutcome, RepositoryError>;

    /// Look up a server by id or slug.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if neither matches.
    async fn get(&self, id_or_slug: &str) -> Result<Server, RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;

    /// Stable page of servers ordered by slug.
    async fn list_page(&self, offset: u64, limit: u32) -> Result<Vec<Server>, RepositoryError>;

    /// Filtered, sorted, paginated search.
    async fn search(&self, query: &CatalogQuery) -> Result<SearchPage, RepositoryError>;

    async fn update_health(
        &self,
        id: ServerId,
        status: HealthStatus,
        checked_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    async fn update_repo_stats(&self, id: ServerId, stats: RepoStats)
    -> Result<(), RepositoryError>;
}

/// Tool rows.
#[async_trait]
pub trait ToolRepository: Send + Sync {
    /// Replace every tool of a server and record the detection source.
    ///
    /// `DetectionSource::None` with an empty slice is stored explicitly so
    /// a failed detection is distinguishable from one that never ran.
    async fn replace_tools(
        &self,
        server_id: ServerId,
        source: DetectionSource,
        tools: &[Tool],
    ) -> Result<(), RepositoryError>;

    async fn list_for_server(&self, server_id: ServerId) -> Result<Vec<Tool>, RepositoryError>;
}

/// Append-only health history.
#[async_trait]
pub trait HealthRepository: Send + Sync {
    async fn record(&self, entry: &HealthEntry) -> Result<(), RepositoryError>;

    /// Newest first, at most `limit` entries.
    async fn recent(&self, server_id: ServerId, limit: u32)
    -> Result<Vec<HealthEntry>, RepositoryError>;
}

#[async_trait]
pub trait ChangelogRepository: Send + Sync {
    async fn append(&self, entry: &ChangelogEntry) -> Result<(), RepositoryError>;

    /// Newest release first.
    async fn list_for_server(
        &self,
        server_id: ServerId,
    ) -> Result<Vec<ChangelogEntry>, RepositoryError>;
}

#[async_trait]
pub trait CompatibilityRepository: Send + Sync {
    async fn append(&self, entry: &CompatibilityEntry) -> Result<(), RepositoryError>;

    async fn list_for_server(
        &self,
        server_id: ServerId,
    ) -> Result<Vec<CompatibilityEntry>, RepositoryError>;
}
