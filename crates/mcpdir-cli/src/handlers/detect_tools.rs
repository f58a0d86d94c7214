//! Detect-tools command handler.

use std::sync::Arc;

use mcpdir_core::{BatchRunner, DetectToolsJob};
use mcpdir_remote::build_detector;

use crate::bootstrap::CliContext;
use crate::commands::{BatchArgs, BatchDefaults};
use crate::error::CliError;
use crate::handlers::run_job;

pub async fn execute(ctx: &CliContext, batch: &BatchArgs, only_missing: bool) -> Result<(), CliError> {
    ctx.warn_if_anonymous_github();
    let detector = build_detector(&ctx.remote(batch.max_retries))?;
    let runner = BatchRunner::new(batch.batch_config(BatchDefaults::default()));

    let job = DetectToolsJob::new(
        Arc::clone(&ctx.repos.servers),
        Arc::clone(&ctx.repos.tools),
        detector,
    )
    .only_missing(only_missing);

    run_job(&job, &runner, batch.output.as_deref()).await?;
    Ok(())
}
