//! Subcommands and the options shared by the batch jobs.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use mcpdir_core::BatchConfig;

/// Batch size and delay a job uses when the command line names neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchDefaults {
    pub batch_size: u32,
    pub delay: Duration,
}

impl BatchDefaults {
    /// One upstream page per batch, half a second between pages.
    pub const SYNC: Self = Self {
        batch_size: 100,
        delay: Duration::from_millis(500),
    };
}

impl Default for BatchDefaults {
    fn default() -> Self {
        let config = BatchConfig::default();
        Self {
            batch_size: config.batch_size,
            delay: config.delay,
        }
    }
}

/// Options shared by every batch job.
///
/// Batch size and delay may be given positionally or as flags; the flags win.
#[derive(Debug, Clone, Default, Args)]
pub struct BatchArgs {
    /// Items per batch
    #[arg(value_name = "BATCH_SIZE")]
    pub batch_size_arg: Option<u32>,

    /// Pause between batches in milliseconds
    #[arg(value_name = "DELAY_MS")]
    pub delay_ms_arg: Option<u64>,

    /// Items per batch
    #[arg(long = "batch-size")]
    pub batch_size: Option<u32>,

    /// Pause between batches in milliseconds
    #[arg(long = "delay", value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Retries for transient HTTP failures
    #[arg(long)]
    pub max_retries: Option<u8>,

    /// Items processed at once inside a batch
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Upper bound on one item in seconds
    #[arg(long, value_name = "SECS")]
    pub item_timeout: Option<u64>,

    /// Write the run report as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Compute results without writing to the database
    #[arg(long)]
    pub dry_run: bool,
}

impl BatchArgs {
    pub fn batch_config(&self, defaults: BatchDefaults) -> BatchConfig {
        let base = BatchConfig::default();
        let batch_size = self
            .batch_size
            .or(self.batch_size_arg)
            .unwrap_or(defaults.batch_size);
        let delay = self
            .delay_ms
            .or(self.delay_ms_arg)
            .map_or(defaults.delay, Duration::from_millis);

        base.clone().with_batch_size(batch_size)
            .with_delay(delay)
            .with_concurrency(self.concurrency.unwrap_or(base.concurrency))
            .with_item_timeout(
                self.item_timeout
                    .map_or(base.item_timeout, Duration::from_secs),
            )
            .with_dry_run(self.dry_run)
    }
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Import and update servers from the PulseMCP directory
    Sync {
        #[command(flatten)]
        batch: BatchArgs,

        /// Save progress here after every batch
        #[arg(long, value_name = "FILE")]
        checkpoint: Option<PathBuf>,

        /// Continue from the checkpoint instead of starting over
        #[arg(long, requires = "checkpoint")]
        resume: bool,
    },

    /// Discover the tools each server exposes
    DetectTools {
        #[command(flatten)]
        batch: BatchArgs,

        /// Skip servers that already have a detection result
        #[arg(long)]
        only_missing: bool,
    },

    /// Probe server endpoints and record their health
    HealthCheck {
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Refresh GitHub statistics
    Enrich {
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Serve the query API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = mcpdir_axum::bootstrap::DEFAULT_PORT)]
        port: u16,
    },
}
