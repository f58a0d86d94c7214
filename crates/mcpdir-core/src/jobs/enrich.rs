//! GitHub repository statistics refresh.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::batch::{
    BatchConfig, BatchJob, BatchOutcome, BatchSlice, ItemOutcome, ItemStatus, run_for_each,
};
use crate::domain::Server;
use crate::ports::{CoreError, RepoStatsPort, ServerRepository};

pub struct EnrichJob {
    servers: Arc<dyn ServerRepository>,
    stats: Arc<dyn RepoStatsPort>,
}

impl EnrichJob {
    pub fn new(servers: Arc<dyn ServerRepository>, stats: Arc<dyn RepoStatsPort>) -> Self {
        Self { servers, stats }
    }

    async fn enrich_one(&self, server: Server, dry_run: bool) -> ItemOutcome {
        let Some(url) = server.github_url.as_deref() else {
            return ItemOutcome::new(&server, ItemStatus::Skipped).with_detail("no github url");
        };
        let stats = match self.stats.fetch(url).await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(server = %server.slug, error = %e, "Failed to fetch repository stats");
                return ItemOutcome::new(&server, ItemStatus::Failed).with_detail(e.to_string());
            }
        };
        let detail = format!(
            "{} stars, {} forks, {} open issues, {} contributors",
            stats.stars, stats.forks, stats.open_issues, stats.contributors
        );
        if dry_run {
            return ItemOutcome::new(&server, ItemStatus::Skipped)
                .with_detail(format!("dry run: {detail}"));
        }

        match self.servers.update_repo_stats(server.id, stats).await {
            Ok(()) => ItemOutcome::new(&server, ItemStatus::Updated).with_detail(detail),
            Err(e) => ItemOutcome::new(&server, ItemStatus::Failed)
                .with_detail(format!("failed to store stats: {e}")),
        }
    }
}

#[async_trait]
impl BatchJob for EnrichJob {
    fn name(&self) -> &'static str {
        "enrich"
    }

    async fn total(&self) -> Result<u64, CoreError> {
        Ok(self.servers.count().await?)
    }

    async fn run_batch(
        &self,
        slice: &BatchSlice,
        config: &BatchConfig,
    ) -> Result<BatchOutcome, CoreError> {
        let servers = self.servers.list_page(slice.offset, slice.size).await?;
        let outcomes =
            run_for_each(servers, config, |server| self.enrich_one(server, config.dry_run)).await;
        Ok(BatchOutcome::from_outcomes(outcomes))
    }
}
