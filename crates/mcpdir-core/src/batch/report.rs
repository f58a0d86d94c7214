//! Run report written at the end of every batch run.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BatchStats, ItemOutcome};
use crate::ports::CoreError;

/// How one batch went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    pub index: u64,
    pub offset: u64,
    pub size: u32,
    pub duration_ms: u64,
    pub stats: BatchStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub job: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub total_items: u64,
    pub batch_size: u32,
    pub total_batches: u64,
    /// Batches attempted, failed ones included. Includes batches completed
    /// before a resume.
    pub batches_processed: u64,
    pub dry_run: bool,
    pub totals: BatchStats,
    pub batches: Vec<BatchRecord>,
    pub outcomes: Vec<ItemOutcome>,
    pub errors: Vec<String>,
}

impl RunReport {
    /// Batches that ended in an error.
    pub fn failed_batches(&self) -> usize {
        self.batches.iter().filter(|b| b.error.is_some()).count()
    }

    /// Write pretty JSON, creating parent directories.
    pub async fn write_json(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| CoreError::Internal(format!("encode report: {e}")))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
