//! Serve command handler.

use std::path::PathBuf;

use mcpdir_axum::{ServerConfig, start_server};

use crate::error::CliError;

/// Serve the query API until the process is stopped.
///
/// Runs without a database too; every answer then comes from mock data.
pub async fn execute(port: u16, database: Option<PathBuf>) -> Result<(), CliError> {
    let config = ServerConfig::default()
        .with_port(port)
        .with_database(database);

    start_server(config)
        .await
        .map_err(|e| CliError::Serve(e.to_string()))
}
