//! Command-line adapter for the MCP directory.
//!
//! Runs the batch jobs (sync, tools detection, health checks, GitHub
//! enrichment) against the catalog database and serves the query API.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{BatchArgs, BatchDefaults, Commands};
pub use error::CliError;
pub use parser::Cli;
