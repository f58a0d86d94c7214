//! Batch orchestration.
//!
//! A [`BatchJob`] knows how many items exist and how to process one slice
//! of them. The [`BatchRunner`] splits the total into fixed-size batches,
//! runs them strictly in sequence with a pause in between, folds each
//! batch's outcome into an accumulator, and produces a [`RunReport`].
//!
//! # Structure
//!
//! - `plan` - Splitting a total into batch slices
//! - `runner` - The sequential runner
//! - `report` - The JSON run report
//! - `checkpoint` - Resumable progress on disk

pub mod checkpoint;
pub mod plan;
pub mod report;
pub mod runner;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use crate::domain::{Server, ServerId};
use crate::ports::CoreError;

pub use checkpoint::{Checkpoint, CheckpointStore};
pub use plan::{BatchPlan, BatchSlice};
pub use report::{BatchRecord, RunReport};
pub use runner::BatchRunner;

pub const DEFAULT_BATCH_SIZE: u32 = 10;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_ITEM_TIMEOUT: Duration = Duration::from_secs(120);

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Knobs shared by every batch job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Items per batch, at least 1.
    pub batch_size: u32,
    /// Pause between consecutive batches.
    pub delay: Duration,
    /// Items processed at once inside a batch. 1 means strictly sequential.
    pub concurrency: usize,
    /// Upper bound on a single item's processing time.
    pub item_timeout: Duration,
    /// Compute outcomes without writing to the store.
    pub dry_run: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            delay: DEFAULT_DELAY,
            concurrency: 1,
            item_timeout: DEFAULT_ITEM_TIMEOUT,
            dry_run: false,
        }
    }
}

impl BatchConfig {
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    #[must_use]
    pub const fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.batch_size == 0 {
            return Err(CoreError::Validation("batch size must be at least 1".into()));
        }
        if self.concurrency == 0 {
            return Err(CoreError::Validation("concurrency must be at least 1".into()));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outcomes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Added,
    Updated,
    Failed,
    Skipped,
}

/// What happened to one server during a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutcome {
    pub server_id: ServerId,
    pub name: String,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ItemOutcome {
    pub fn new(server: &Server, status: ItemStatus) -> Self {
        Self {
            server_id: server.id,
            name: server.name.clone(),
            status,
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Counters for a batch or a whole run.
///
/// `processed` counts every item; the other four partition it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub processed: u64,
    pub added: u64,
    pub updated: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl BatchStats {
    pub fn from_outcomes(outcomes: &[ItemOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut stats, outcome| {
            stats.processed += 1;
            match outcome.status {
                ItemStatus::Added => stats.added += 1,
                ItemStatus::Updated => stats.updated += 1,
                ItemStatus::Failed => stats.failed += 1,
                ItemStatus::Skipped => stats.skipped += 1,
            }
            stats
        })
    }

    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            processed: self.processed + other.processed,
            added: self.added + other.added,
            updated: self.updated + other.updated,
            failed: self.failed + other.failed,
            skipped: self.skipped + other.skipped,
        }
    }
}

/// Result of one successful batch.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub stats: BatchStats,
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchOutcome {
    pub fn from_outcomes(outcomes: Vec<ItemOutcome>) -> Self {
        Self {
            stats: BatchStats::from_outcomes(&outcomes),
            outcomes,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Jobs
// ─────────────────────────────────────────────────────────────────────────────

/// A unit of work the runner can split into batches.
#[async_trait]
pub trait BatchJob: Send + Sync {
    /// Stable name used in reports and checkpoints.
    fn name(&self) -> &'static str;

    /// Number of items to process. A failure here aborts the run.
    async fn total(&self) -> Result<u64, CoreError>;

    /// Process one slice. An error marks the whole batch failed.
    async fn run_batch(
        &self,
        slice: &BatchSlice,
        config: &BatchConfig,
    ) -> Result<BatchOutcome, CoreError>;
}

/// Process servers with bounded concurrency and a per-item timeout.
///
/// Outcomes come back in input order. An item that exceeds the timeout is
/// reported as failed.
pub async fn run_for_each<F, Fut>(
    servers: Vec<Server>,
    config: &BatchConfig,
    work: F,
) -> Vec<ItemOutcome>
where
    F: Fn(Server) -> Fut,
    Fut: Future<Output = ItemOutcome>,
{
    let timeout = config.item_timeout;
    stream::iter(servers)
        .map(|server| {
            let id = server.id;
            let name = server.name.clone();
            let fut = work(server);
            async move {
                match tokio::time::timeout(timeout, fut).await {
                    Ok(outcome) => outcome,
                    Err(_) => ItemOutcome {
                        server_id: id,
                        name,
                        status: ItemStatus::Failed,
                        detail: Some(format!("timed out after {}ms", timeout.as_millis())),
                    },
                }
            }
        })
        .buffered(config.concurrency.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::testing::sample_server;

    #[test]
    fn test_stats_partition_outcomes() {
        let s = sample_server("a");
        let outcomes = vec![
            ItemOutcome::new(&s, ItemStatus::Added),
            ItemOutcome::new(&s, ItemStatus::Updated),
            ItemOutcome::new(&s, ItemStatus::Failed),
            ItemOutcome::new(&s, ItemStatus::Skipped),
            ItemOutcome::new(&s, ItemStatus::Updated),
        ];
        let stats = BatchStats::from_outcomes(&outcomes);
        assert_eq!(stats.processed, 5);
        assert_eq!(stats.updated, 2);
        assert_eq!(stats.merge(stats).failed, 2);
    }

    #[test]
    fn test_config_validation() {
        assert!(BatchConfig::default().validate().is_ok());
        assert!(BatchConfig::default().with_batch_size(0).validate().is_err());
        assert!(BatchConfig::default().with_concurrency(0).validate().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_for_each_times_out_slow_items() {
        let config = BatchConfig::default()
            .with_concurrency(2)
            .with_item_timeout(Duration::from_secs(1));
        let servers = vec![sample_server("fast"), sample_server("slow")];

        let outcomes = run_for_each(servers, &config, |server| async move {
            if server.slug == "slow" {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            ItemOutcome::new(&server, ItemStatus::Updated)
        })
        .await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].status, ItemStatus::Updated);
        assert_eq!(outcomes[1].status, ItemStatus::Failed);
        assert_eq!(outcomes[1].name, "slow");
    }

    #[tokio::test]
    async fn test_run_for_each_keeps_input_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let config = BatchConfig::default().with_concurrency(3);
        let servers: Vec<_> = ["a", "b", "c", "d"].into_iter().map(sample_server).collect();

        let outcomes = run_for_each(servers, &config, |server| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                ItemOutcome::new(&server, ItemStatus::Skipped)
            }
        })
        .await;

        let names: Vec<_> = outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
