//! Tool detection tiers.
//!
//! | tier | probe |
//! |------|-------|
//! | `standard_mcp_api` | `GET {external_url}/list_resources` |
//! | `alternative_api` | `GET {external_url}/api/tools` |
//! | `github_repository` | manifests, then README heuristics |

pub mod alternative;
pub mod github;
pub mod heuristics;
pub mod standard;

use mcpdir_core::{Server, TierError};

pub use alternative::AlternativeApiTier;
pub use github::GithubRepositoryTier;
pub use standard::StandardMcpTier;

/// The server's external URL, or `NotApplicable`.
pub(crate) fn external_url(server: &Server) -> Result<&str, TierError> {
    server
        .external_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| TierError::NotApplicable("no external url".to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Utc;
    use mcpdir_core::normalize::normalize;
    use mcpdir_core::{Server, UpstreamServer};

    pub(crate) fn server_with(external_url: Option<&str>, github_url: Option<&str>) -> Server {
        normalize(
            &UpstreamServer {
                name: "Tier Target".into(),
                external_url: external_url.map(str::to_string),
                source_code_url: github_url.map(str::to_string),
                ..UpstreamServer::default()
            },
            Utc::now(),
        )
    }
}
