//! Remote adapters for mcpdir.
//!
//! PulseMCP directory client, GitHub client, the three tool detection tiers
//! and the endpoint health probe. Everything goes through [`http::HttpBackend`]
//! so tests can swap the network for canned responses.

#![deny(unsafe_code)]

mod config;
mod error;
mod github;
mod health;
mod http;
mod pulse;
mod tiers;
mod url;

use std::sync::Arc;

use mcpdir_core::ToolsDetector;

// ============================================================================
// Public API
// ============================================================================

// Configuration
pub use config::{DEFAULT_GITHUB_API_URL, DEFAULT_PULSE_BASE_URL, RemoteConfig};

// Errors
pub use error::{RemoteError, RemoteResult};

// Clients
pub use github::{ContentEntry, DefaultGithubClient, GithubClient, RepoRef};
pub use http::{HttpBackend, ReqwestBackend};
pub use pulse::{DEFAULT_PAGE_SIZE, DefaultPulseClient, PulseClient};

// Detection
pub use tiers::heuristics::{tools_from_manifest, tools_from_readme};
pub use tiers::{AlternativeApiTier, GithubRepositoryTier, StandardMcpTier};

// Health
pub use health::{HttpHealthProbe, classify as classify_health};

/// Detector wired with the production tiers in priority order.
pub fn build_detector(config: &RemoteConfig) -> RemoteResult<ToolsDetector> {
    let backend = ReqwestBackend::new(config)?;
    Ok(ToolsDetector::new(
        Arc::new(StandardMcpTier::new(backend.clone())),
        Arc::new(AlternativeApiTier::new(backend)),
        Arc::new(GithubRepositoryTier::new(DefaultGithubClient::new(config)?)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_detector_with_defaults() {
        assert!(build_detector(&RemoteConfig::new()).is_ok());
    }

    #[test]
    fn test_build_detector_rejects_bad_github_url() {
        let config = RemoteConfig::new().with_github_api_url("not a url");
        assert!(matches!(
            build_detector(&config),
            Err(RemoteError::InvalidUrl(_))
        ));
    }
}
