//! Health-check command handler.

use std::sync::Arc;

use mcpdir_core::{BatchRunner, HealthCheckJob};
use mcpdir_remote::HttpHealthProbe;

use crate::bootstrap::CliContext;
use crate::commands::{BatchArgs, BatchDefaults};
use crate::error::CliError;
use crate::handlers::run_job;

pub async fn execute(ctx: &CliContext, batch: &BatchArgs) -> Result<(), CliError> {
    let probe = HttpHealthProbe::new(&ctx.remote(batch.max_retries))?;
    let runner = BatchRunner::new(batch.batch_config(BatchDefaults::default()));

    let job = HealthCheckJob::new(
        Arc::clone(&ctx.repos.servers),
        Arc::clone(&ctx.repos.health),
        Arc::new(probe),
    );

    run_job(&job, &runner, batch.output.as_deref()).await?;
    Ok(())
}
