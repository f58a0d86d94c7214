//! Command handlers.
//!
//! Each handler composes a job from the [`CliContext`](crate::bootstrap::CliContext),
//! runs it through the batch runner and prints the summary. Batch failures
//! are reported, never returned as errors.

pub mod detect_tools;
pub mod enrich;
pub mod health_check;
pub mod serve;
pub mod sync;

use std::path::Path;

use mcpdir_core::{BatchJob, BatchRunner, RunReport};

use crate::error::CliError;
use crate::presentation::print_report;

/// Run `job`, write the JSON report if asked, print the summary.
pub(crate) async fn run_job(
    job: &dyn BatchJob,
    runner: &BatchRunner,
    output: Option<&Path>,
) -> Result<RunReport, CliError> {
    let report = runner.run(job).await?;

    print_report(&report);
    if let Some(path) = output {
        report.write_json(path).await?;
        println!("\nReport written to {}", path.display());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use mcpdir_core::{BatchConfig, BatchOutcome, BatchSlice, CoreError};

    use super::*;

    /// Three single-item batches; the middle one fails.
    struct FlakyJob {
        total_fails: bool,
    }

    #[async_trait]
    impl BatchJob for FlakyJob {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn total(&self) -> Result<u64, CoreError> {
            if self.total_fails {
                return Err(CoreError::Upstream("count unavailable".into()));
            }
            Ok(3)
        }

        async fn run_batch(
            &self,
            slice: &BatchSlice,
            _config: &BatchConfig,
        ) -> Result<BatchOutcome, CoreError> {
            if slice.index == 1 {
                return Err(CoreError::Upstream("page timed out".into()));
            }
            Ok(BatchOutcome::from_outcomes(Vec::new()))
        }
    }

    fn runner() -> BatchRunner {
        BatchRunner::new(
            BatchConfig::default()
                .with_batch_size(1)
                .with_delay(Duration::ZERO),
        )
    }

    #[tokio::test]
    async fn test_batch_failure_is_reported_not_returned() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.json");

        let report = run_job(&FlakyJob { total_fails: false }, &runner(), Some(&output))
            .await
            .unwrap();

        assert_eq!(report.total_batches, 3);
        assert_eq!(report.errors.len(), 1);
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("\"flaky\""));
    }

    #[tokio::test]
    async fn test_total_failure_is_fatal() {
        let err = run_job(&FlakyJob { total_fails: true }, &runner(), None)
            .await
            .unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("count unavailable"));
    }
}
