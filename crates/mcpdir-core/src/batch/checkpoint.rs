//! On-disk progress checkpoint.
//!
//! The runner saves a checkpoint after every batch so an operator can kill
//! the process and resume later. The next offset is the only resume key; a
//! crash mid-batch reprocesses that batch, which is safe because server ids
//! are deterministic.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::BatchStats;
use crate::ports::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Job that wrote this checkpoint.
    pub job: String,
    pub next_offset: u64,
    pub batches_completed: u64,
    pub totals: BatchStats,
    pub updated_at: DateTime<Utc>,
}

/// Reads and writes a checkpoint file.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the checkpoint for `job`.
    ///
    /// A missing file, an unreadable file, or a checkpoint written by a
    /// different job all mean "start from the beginning".
    pub async fn load(&self, job: &str) -> Result<Option<Checkpoint>, CoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Checkpoint>(&bytes) {
            Ok(checkpoint) if checkpoint.job == job => {
                debug!(path = %self.path.display(), offset = checkpoint.next_offset, "Loaded checkpoint");
                Ok(Some(checkpoint))
            }
            Ok(checkpoint) => {
                warn!(
                    path = %self.path.display(),
                    found = %checkpoint.job,
                    expected = job,
                    "Ignoring checkpoint written by another job"
                );
                Ok(None)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable checkpoint");
                Ok(None)
            }
        }
    }

    /// Write atomically via a sibling temp file.
    pub async fn save(&self, checkpoint: &Checkpoint) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(checkpoint)
            .map_err(|e| CoreError::Internal(format!("encode checkpoint: {e}")))?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Remove the file. Missing files are fine.
    pub async fn clear(&self) -> Result<(), CoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkpoint(job: &str) -> Checkpoint {
        Checkpoint {
            job: job.to_string(),
            next_offset: 20,
            batches_completed: 2,
            totals: BatchStats {
                processed: 20,
                added: 20,
                ..BatchStats::default()
            },
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("nested/sync.json"));

        assert!(store.load("sync").await.unwrap().is_none());

        store.save(&checkpoint("sync")).await.unwrap();
        let loaded = store.load("sync").await.unwrap().unwrap();
        assert_eq!(loaded.next_offset, 20);
        assert_eq!(loaded.totals.added, 20);

        store.clear().await.unwrap();
        assert!(!store.path().exists());
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_foreign_or_corrupt_checkpoint_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("cp.json"));

        store.save(&checkpoint("enrich")).await.unwrap();
        assert!(store.load("sync").await.unwrap().is_none());

        std::fs::write(store.path(), b"{not json").unwrap();
        assert!(store.load("sync").await.unwrap().is_none());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(checkpoint("sync")).unwrap();
        assert_eq!(json["nextOffset"], 20);
        assert_eq!(json["batchesCompleted"], 2);
    }
}
