//! Sequential batch runner.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use super::checkpoint::{Checkpoint, CheckpointStore};
use super::plan::{BatchPlan, BatchSlice};
use super::report::{BatchRecord, RunReport};
use super::{BatchConfig, BatchJob, BatchOutcome, BatchStats, ItemOutcome, ItemStatus};
use crate::ports::{CoreError, Pacer, TokioPacer};

/// Everything a run has gathered so far. Each batch consumes the previous
/// value and returns the next.
#[derive(Debug, Default)]
struct Progress {
    totals: BatchStats,
    batches_completed: u64,
    batches: Vec<BatchRecord>,
    outcomes: Vec<ItemOutcome>,
    errors: Vec<String>,
}

impl Progress {
    fn resumed(checkpoint: &Checkpoint) -> Self {
        Self {
            totals: checkpoint.totals,
            batches_completed: checkpoint.batches_completed,
            ..Self::default()
        }
    }

    fn record(
        mut self,
        slice: &BatchSlice,
        result: Result<BatchOutcome, CoreError>,
        duration_ms: u64,
    ) -> Self {
        let (stats, error) = match result {
            Ok(outcome) => {
                self.errors.extend(
                    outcome
                        .outcomes
                        .iter()
                        .filter(|o| o.status == ItemStatus::Failed)
                        .map(|o| format!("{}: {}", o.name, o.detail.as_deref().unwrap_or("failed"))),
                );
                self.outcomes.extend(outcome.outcomes);
                (outcome.stats, None)
            }
            Err(e) => {
                self.errors
                    .push(format!("batch {} (offset {}): {e}", slice.index, slice.offset));
                (BatchStats::default(), Some(e.to_string()))
            }
        };

        self.totals = self.totals.merge(stats);
        self.batches_completed += 1;
        self.batches.push(BatchRecord {
            index: slice.index,
            offset: slice.offset,
            size: slice.size,
            duration_ms,
            stats,
            error,
        });
        self
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Runs a [`BatchJob`] batch by batch.
///
/// Batches run strictly in order. The configured delay is paused between
/// batches but not after the last one. A batch that fails is recorded and
/// the run moves on.
pub struct BatchRunner {
    config: BatchConfig,
    pacer: Arc<dyn Pacer>,
    checkpoint: Option<CheckpointStore>,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            pacer: Arc::new(TokioPacer),
            checkpoint: None,
        }
    }

    #[must_use]
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Persist progress after every batch and resume from it.
    #[must_use]
    pub fn with_checkpoint(mut self, store: CheckpointStore) -> Self {
        self.checkpoint = Some(store);
        self
    }

    pub const fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run every batch and build the report.
    ///
    /// Only configuration problems and a failing `total()` are errors;
    /// batch failures end up in the report.
    pub async fn run(&self, job: &dyn BatchJob) -> Result<RunReport, CoreError> {
        self.config.validate()?;
        let started_at = Utc::now();
        let clock = Instant::now();

        let total = job.total().await?;

        let resume = match &self.checkpoint {
            Some(store) => store.load(job.name()).await?,
            None => None,
        };
        let start_offset = resume.as_ref().map_or(0, |c| c.next_offset);
        let mut progress = resume.as_ref().map(Progress::resumed).unwrap_or_default();

        let plan = BatchPlan::new(total, self.config.batch_size, start_offset);
        info!(
            job = job.name(),
            total,
            batch_size = plan.batch_size(),
            batches = plan.remaining_batches(),
            start_offset,
            dry_run = self.config.dry_run,
            "Starting batch run"
        );

        for (n, slice) in plan.slices().enumerate() {
            if n > 0 {
                self.pacer.pause(self.config.delay).await;
            }

            let batch_clock = Instant::now();
            let result = job.run_batch(&slice, &self.config).await;
            let duration_ms = elapsed_ms(batch_clock);

            match &result {
                Ok(outcome) => info!(
                    job = job.name(),
                    batch = slice.index,
                    processed = outcome.stats.processed,
                    failed = outcome.stats.failed,
                    duration_ms,
                    "Batch finished"
                ),
                Err(e) => warn!(
                    job = job.name(),
                    batch = slice.index,
                    offset = slice.offset,
                    error = %e,
                    "Batch failed, continuing"
                ),
            }
            progress = progress.record(&slice, result, duration_ms);

            if let Some(store) = &self.checkpoint {
                let checkpoint = Checkpoint {
                    job: job.name().to_string(),
                    next_offset: slice.end(),
                    batches_completed: progress.batches_completed,
                    totals: progress.totals,
                    updated_at: Utc::now(),
                };
                if let Err(e) = store.save(&checkpoint).await {
                    warn!(path = %store.path().display(), error = %e, "Failed to save checkpoint");
                }
            }
        }

        if let Some(store) = &self.checkpoint {
            store.clear().await?;
        }

        let report = RunReport {
            job: job.name().to_string(),
            started_at,
            finished_at: Utc::now(),
            duration_ms: elapsed_ms(clock),
            total_items: total,
            batch_size: plan.batch_size(),
            total_batches: plan.total_batches(),
            batches_processed: progress.batches_completed,
            dry_run: self.config.dry_run,
            totals: progress.totals,
            batches: progress.batches,
            outcomes: progress.outcomes,
            errors: progress.errors,
        };
        info!(
            job = %report.job,
            batches = report.batches_processed,
            processed = report.totals.processed,
            failed = report.totals.failed,
            duration_ms = report.duration_ms,
            "Batch run complete"
        );
        Ok(report)
    }
}
