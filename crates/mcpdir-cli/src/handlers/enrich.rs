//! Enrich command handler.

use std::sync::Arc;

use mcpdir_core::{BatchRunner, EnrichJob};
use mcpdir_remote::DefaultGithubClient;

use crate::bootstrap::CliContext;
use crate::commands::{BatchArgs, BatchDefaults};
use crate::error::CliError;
use crate::handlers::run_job;

/// Refresh stars, forks, open issues and contributors from GitHub.
pub async fn execute(ctx: &CliContext, batch: &BatchArgs) -> Result<(), CliError> {
    ctx.warn_if_anonymous_github();
    let github = DefaultGithubClient::new(&ctx.remote(batch.max_retries))?;
    let runner = BatchRunner::new(batch.batch_config(BatchDefaults::default()));

    let job = EnrichJob::new(Arc::clone(&ctx.repos.servers), Arc::new(github));

    run_job(&job, &runner, batch.output.as_deref()).await?;
    Ok(())
}
