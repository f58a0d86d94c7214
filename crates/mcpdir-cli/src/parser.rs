//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the MCP directory.
#[derive(Parser)]
#[command(name = "mcpdir")]
#[command(about = "Populate, enrich and serve the MCP server directory")]
#[command(version)]
pub struct Cli {
    /// Catalog database file
    #[arg(long, global = true, env = "MCPDIR_DATABASE")]
    pub database: Option<PathBuf>,

    /// GitHub token for repository metadata and README lookups
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// PulseMCP API base URL
    #[arg(long, global = true, env = "PULSEMCP_API_URL")]
    pub pulse_url: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
