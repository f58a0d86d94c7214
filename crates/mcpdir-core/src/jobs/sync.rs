//! Catalog sync from the upstream directory.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use crate::batch::{BatchConfig, BatchJob, BatchOutcome, BatchSlice, ItemOutcome, ItemStatus};
use crate::normalize::normalize;
use crate::ports::{CoreError, ServerCatalogPort, ServerRepository, UpsertOutcome};

/// One upstream page per batch: fetch, normalize, upsert.
pub struct SyncJob {
    upstream: Arc<dyn ServerCatalogPort>,
    servers: Arc<dyn ServerRepository>,
}

impl SyncJob {
    pub fn new(upstream: Arc<dyn ServerCatalogPort>, servers: Arc<dyn ServerRepository>) -> Self {
        Self { upstream, servers }
    }
}

#[async_trait]
impl BatchJob for SyncJob {
    fn name(&self) -> &'static str {
        "sync"
    }

    async fn total(&self) -> Result<u64, CoreError> {
        self.upstream.total_count().await
    }

    async fn run_batch(
        &self,
        slice: &BatchSlice,
        config: &BatchConfig,
    ) -> Result<BatchOutcome, CoreError> {
        let page = self.upstream.fetch_page(slice.offset, slice.size).await?;
        debug!(offset = slice.offset, received = page.servers.len(), "Fetched upstream page");

        let now = Utc::now();
        let mut outcomes = Vec::with_capacity(page.servers.len());
        for record in &page.servers {
            let server = normalize(record, now);
            if server.name.is_empty() {
                outcomes.push(
                    ItemOutcome::new(&server, ItemStatus::Skipped).with_detail("missing name"),
                );
                continue;
            }
            if config.dry_run {
                outcomes.push(ItemOutcome::new(&server, ItemStatus::Skipped).with_detail("dry run"));
                continue;
            }

            let outcome = match self.servers.upsert(&server).await {
                Ok(UpsertOutcome::Inserted) => ItemOutcome::new(&server, ItemStatus::Added),
                Ok(UpsertOutcome::Updated) => ItemOutcome::new(&server, ItemStatus::Updated),
                Err(e) => {
                    warn!(server = %server.slug, error = %e, "Upsert failed");
                    ItemOutcome::new(&server, ItemStatus::Failed)
                        .with_detail(format!("failed to store {}: {e}", server.id))
                }
            };
            outcomes.push(outcome);
        }

        Ok(BatchOutcome::from_outcomes(outcomes))
    }
}
