//! Sync command handler.

use std::path::PathBuf;
use std::sync::Arc;

use mcpdir_core::{BatchRunner, CheckpointStore, SyncJob};
use mcpdir_remote::DefaultPulseClient;
use tracing::info;

use crate::bootstrap::CliContext;
use crate::commands::{BatchArgs, BatchDefaults};
use crate::error::CliError;
use crate::handlers::run_job;
use crate::presentation::table_change;

pub struct SyncArgs {
    pub batch: BatchArgs,
    pub checkpoint: Option<PathBuf>,
    pub resume: bool,
}

/// Page through PulseMCP and upsert every server.
///
/// Without `resume`, a leftover checkpoint is discarded and the sync starts
/// from the first page.
pub async fn execute(ctx: &CliContext, args: &SyncArgs) -> Result<(), CliError> {
    let upstream = DefaultPulseClient::new(&ctx.remote(args.batch.max_retries))?;
    let config = args.batch.batch_config(BatchDefaults::SYNC);

    let mut runner = BatchRunner::new(config);
    if let Some(path) = &args.checkpoint {
        let store = CheckpointStore::new(path);
        if !args.resume {
            store.clear().await?;
        }
        runner = runner.with_checkpoint(store);
    }

    println!("MCP server sync");
    let before = ctx.repos.servers.count().await?;
    println!("  Current servers count: {before}");

    let job = SyncJob::new(Arc::new(upstream), Arc::clone(&ctx.repos.servers));
    let report = run_job(&job, &runner, args.batch.output.as_deref()).await?;

    let after = ctx.repos.servers.count().await?;
    println!("\nTable changes:");
    println!("{}", table_change("servers", before, after));

    info!(
        added = report.totals.added,
        updated = report.totals.updated,
        failed = report.totals.failed,
        "Sync finished"
    );
    Ok(())
}
