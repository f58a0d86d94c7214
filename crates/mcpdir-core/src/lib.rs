//! Core of the MCP directory.
//!
//! Domain types, normalization of upstream records, ports implemented by the
//! adapter crates, the tiered tools detector, batch orchestration, and the
//! catalog query model shared by the SQLite store and the mock catalog.

pub mod batch;
pub mod catalog;
pub mod detector;
pub mod domain;
pub mod jobs;
pub mod normalize;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types for convenience
pub use batch::{
    BatchConfig, BatchJob, BatchOutcome, BatchRunner, BatchSlice, BatchStats, Checkpoint,
    CheckpointStore, ItemOutcome, ItemStatus, RunReport,
};
pub use catalog::{
    CatalogQuery, CatalogQueryError, InMemoryCatalog, SearchPage, SearchParams, SortField,
    SortOrder,
};
pub use detector::{Detection, TierAttempt, ToolsDetector};
pub use domain::{
    Category, ChangelogEntry, CompatibilityEntry, DetectionSource, DiscoveredTool, HealthEntry,
    HealthStatus, HttpMethod, InstallInstructions, InstallStep, RECENT_HEALTH_LIMIT, RepoStats,
    Server, ServerDetail, ServerId, Tool,
};
pub use jobs::{DetectToolsJob, EnrichJob, HealthCheckJob, SyncJob};
pub use ports::{
    CatalogPage, CatalogReader, ChangelogRepository, CompatibilityRepository, CoreError,
    HealthProbe, HealthRepository, Pacer, RepoStatsPort, Repos, RepositoryError,
    ServerCatalogPort, ServerRepository, TierError, TokioPacer, ToolRepository, ToolTier,
    UpsertOutcome, UpstreamServer,
};
