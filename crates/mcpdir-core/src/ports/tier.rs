//! Tools detection tier port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{DetectionSource, DiscoveredTool, Server};

/// Why a tier produced nothing.
#[derive(Debug, Error)]
pub enum TierError {
    /// The server lacks what this tier needs (no URL, no GitHub repo).
    #[error("not applicable: {0}")]
    NotApplicable(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The tier answered but listed no tools.
    #[error("no tools found")]
    Empty,
}

/// One strategy for discovering a server's tools.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolTier: Send + Sync {
    /// Source tag attached to tools this tier finds.
    fn source(&self) -> DetectionSource;

    async fn discover(&self, server: &Server) -> Result<Vec<DiscoveredTool>, TierError>;
}
