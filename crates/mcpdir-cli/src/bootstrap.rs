//! CLI bootstrap, the composition root for the batch commands.
//!
//! Opens the catalog database and holds the remote client configuration.
//! Handlers build the clients they need from it.

use std::path::PathBuf;

use mcpdir_core::Repos;
use mcpdir_db::{CatalogFactory, setup_database};
use mcpdir_remote::RemoteConfig;
use tracing::{debug, warn};

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Catalog database file.
    pub database: Option<PathBuf>,
    /// GitHub token, sent to the GitHub API only.
    pub github_token: Option<String>,
    /// PulseMCP base URL override.
    pub pulse_url: Option<String>,
}

impl CliConfig {
    /// Remote configuration for one command run.
    pub fn remote(&self, max_retries: Option<u8>) -> RemoteConfig {
        let mut config = RemoteConfig::new().with_github_token(self.github_token.clone());
        if let Some(url) = &self.pulse_url {
            config = config.with_pulse_base_url(url.clone());
        }
        if let Some(retries) = max_retries {
            config = config.with_max_retries(retries);
        }
        config
    }
}

/// Everything a batch command needs.
pub struct CliContext {
    pub repos: Repos,
    pub config: CliConfig,
}

impl CliContext {
    /// Remote configuration with an optional retry override.
    pub fn remote(&self, max_retries: Option<u8>) -> RemoteConfig {
        self.config.remote(max_retries)
    }

    /// Warn once per command that GitHub will be queried anonymously.
    pub fn warn_if_anonymous_github(&self) {
        if self.config.github_token.is_none() {
            warn!("GITHUB_TOKEN not set, GitHub requests are subject to anonymous rate limits");
        }
    }
}

/// Open the catalog database.
///
/// Fails with [`CliError::MissingDatabase`] before touching anything when no
/// database is configured.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let Some(path) = &config.database else {
        return Err(CliError::MissingDatabase);
    };

    let pool = setup_database(path)
        .await
        .map_err(|e| CliError::Database(format!("{}: {e}", path.display())))?;
    debug!(database = %path.display(), "Catalog database ready");

    Ok(CliContext {
        repos: CatalogFactory::build_repos(pool),
        config,
    })
}
