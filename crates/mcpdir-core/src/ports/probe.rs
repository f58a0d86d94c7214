//! Health and repository statistics probes.

use async_trait::async_trait;

use super::CoreError;
use crate::domain::{HealthEntry, RepoStats, Server};

#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Check a server's endpoint. `None` when the server has no endpoint.
    async fn check(&self, server: &Server) -> Option<HealthEntry>;
}

#[async_trait]
pub trait RepoStatsPort: Send + Sync {
    /// Fetch stars, forks, open issues and contributor count.
    async fn fetch(&self, github_url: &str) -> Result<RepoStats, CoreError>;
}
