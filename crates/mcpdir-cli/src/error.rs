//! CLI-specific error types and mappings.
//!
//! Every fatal error exits with status 1. Batch failures are not errors;
//! they are reported and the process still exits 0.

use mcpdir_core::{CoreError, RepositoryError};
use mcpdir_remote::RemoteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// A writing command was started without a catalog database.
    #[error("No catalog database configured. Pass --database or set MCPDIR_DATABASE")]
    MissingDatabase,

    /// Core domain error, including a failed upstream count.
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Server error: {0}")]
    Serve(String),

    /// Stopped by Ctrl-C.
    #[error("Interrupted")]
    Interrupted,
}

impl CliError {
    /// Process exit status for this error.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Interrupted => 130,
            _ => 1,
        }
    }
}

impl From<RepositoryError> for CliError {
    fn from(err: RepositoryError) -> Self {
        Self::Core(CoreError::Repository(err))
    }
}

impl From<RemoteError> for CliError {
    fn from(err: RemoteError) -> Self {
        Self::Core(err.into())
    }
}
