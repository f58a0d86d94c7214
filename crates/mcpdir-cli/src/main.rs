//! CLI entry point, the composition root.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use mcpdir_cli::handlers::{self, sync::SyncArgs};
use mcpdir_cli::{Cli, CliConfig, CliError, Commands, bootstrap};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn dispatch(command: Commands, config: CliConfig) -> Result<(), CliError> {
    match command {
        Commands::Serve { port } => handlers::serve::execute(port, config.database).await,
        Commands::Sync {
            batch,
            checkpoint,
            resume,
        } => {
            let ctx = bootstrap(config).await?;
            let args = SyncArgs {
                batch,
                checkpoint,
                resume,
            };
            handlers::sync::execute(&ctx, &args).await
        }
        Commands::DetectTools {
            batch,
            only_missing,
        } => {
            let ctx = bootstrap(config).await?;
            handlers::detect_tools::execute(&ctx, &batch, only_missing).await
        }
        Commands::HealthCheck { batch } => {
            let ctx = bootstrap(config).await?;
            handlers::health_check::execute(&ctx, &batch).await
        }
        Commands::Enrich { batch } => {
            let ctx = bootstrap(config).await?;
            handlers::enrich::execute(&ctx, &batch).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Before parsing, so .env can supply MCPDIR_DATABASE and GITHUB_TOKEN
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        // No command provided - show help
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    };

    let config = CliConfig {
        database: cli.database,
        github_token: cli.github_token,
        pulse_url: cli.pulse_url,
    };

    let result = tokio::select! {
        result = dispatch(command, config) => result,
        _ = tokio::signal::ctrl_c() => Err(CliError::Interrupted),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
