//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core expects from infrastructure: the
//! upstream catalog, the catalog store, detection tiers, health probes and
//! the inter-batch pacer. They use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` or `reqwest` types in any signature
//! - Repositories are small and storage-shaped
//! - Detection tiers report failures; the detector decides what to do with them

pub mod catalog;
pub mod pacer;
pub mod probe;
pub mod reader;
pub mod repository;
pub mod tier;

use std::sync::Arc;
use thiserror::Error;

pub use catalog::{CatalogPage, ServerCatalogPort, UpstreamServer};
pub use pacer::{Pacer, TokioPacer};
pub use probe::{HealthProbe, RepoStatsPort};
pub use reader::CatalogReader;
pub use repository::{
    ChangelogRepository, CompatibilityRepository, HealthRepository, ServerRepository,
    ToolRepository, UpsertOutcome,
};
pub use tier::{TierError, ToolTier};

#[cfg(test)]
pub use tier::MockToolTier;

/// Container for all repository trait objects.
///
/// Adapters build one of these from their storage backend so jobs and
/// handlers can be wired without knowing the concrete store.
#[derive(Clone)]
pub struct Repos {
    pub servers: Arc<dyn ServerRepository>,
    pub tools: Arc<dyn ToolRepository>,
    pub health: Arc<dyn HealthRepository>,
    pub changelog: Arc<dyn ChangelogRepository>,
    pub compatibility: Arc<dyn CompatibilityRepository>,
}

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., sqlx errors)
/// and provides a clean interface for services to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A constraint was violated (e.g., foreign key, unique constraint).
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (HTTP status codes,
/// CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Upstream API (PulseMCP, GitHub) failed after retries.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Filesystem error (checkpoints, reports).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (unexpected condition).
    #[error("Internal error: {0}")]
    Internal(String),
}
