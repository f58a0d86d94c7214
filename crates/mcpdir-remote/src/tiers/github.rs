//! GitHub repository heuristics.
//!
//! Checks manifest files in the repository root first, then falls back to
//! scanning the README.

use async_trait::async_trait;
use mcpdir_core::{DetectionSource, DiscoveredTool, Server, TierError, ToolTier};
use tracing::debug;

use super::heuristics::{MANIFEST_FILES, tools_from_manifest, tools_from_readme};
use crate::github::{GithubClient, RepoRef};
use crate::http::HttpBackend;

pub struct GithubRepositoryTier<B: HttpBackend> {
    github: GithubClient<B>,
}

impl<B: HttpBackend> GithubRepositoryTier<B> {
    pub const fn new(github: GithubClient<B>) -> Self {
        Self { github }
    }

    async fn from_manifests(&self, repo: &RepoRef) -> Result<Vec<DiscoveredTool>, TierError> {
        let listing = self.github.root_contents(repo).await?;
        for manifest in MANIFEST_FILES {
            let present = listing
                .iter()
                .any(|entry| entry.kind == "file" && entry.name.eq_ignore_ascii_case(manifest));
            if !present {
                continue;
            }
            match self.github.file(repo, manifest).await {
                Ok(text) => {
                    let tools = tools_from_manifest(&text);
                    if !tools.is_empty() {
                        debug!(repo = %repo.repo, manifest, count = tools.len(), "Tools from manifest");
                        return Ok(tools);
                    }
                }
                Err(e) => debug!(repo = %repo.repo, manifest, error = %e, "Manifest unreadable"),
            }
        }
        Ok(Vec::new())
    }
}

#[async_trait]
impl<B: HttpBackend> ToolTier for GithubRepositoryTier<B> {
    fn source(&self) -> DetectionSource {
        DetectionSource::GithubRepository
    }

    async fn discover(&self, server: &Server) -> Result<Vec<DiscoveredTool>, TierError> {
        let repo = server
            .github_url
            .as_deref()
            .and_then(RepoRef::from_url)
            .ok_or_else(|| TierError::NotApplicable("no github url".to_string()))?;

        let tools = self.from_manifests(&repo).await?;
        if !tools.is_empty() {
            return Ok(tools);
        }

        match self.github.readme(&repo).await {
            Ok(readme) => Ok(tools_from_readme(&readme)),
            Err(e) if e.status() == Some(404) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::tests::encoded;
    use crate::http::testing::FakeBackend;
    use crate::tiers::tests::server_with;
    use serde_json::json;
    use url::Url;

    fn tier(backend: FakeBackend) -> GithubRepositoryTier<FakeBackend> {
        GithubRepositoryTier::new(GithubClient::with_backend(
            Url::parse("https://api.github.com").unwrap(),
            backend,
        ))
    }

    fn server() -> Server {
        server_with(None, Some("https://github.com/acme/tools"))
    }

    #[tokio::test]
    async fn test_manifest_wins_over_readme() {
        let backend = FakeBackend::new()
            .with_json("/contents/mcp.json", encoded(r#"{"tools": ["alpha", "beta"]}"#))
            .with_json(
                "/contents/",
                json!([
                    {"name": "README.md", "path": "README.md", "type": "file"},
                    {"name": "mcp.json", "path": "mcp.json", "type": "file"}
                ]),
            )
            .with_json("/readme", encoded("## Tools\n- gamma\n"));

        let tools = tier(backend.clone()).discover(&server()).await.unwrap();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
        assert!(!backend.requests().iter().any(|u| u.ends_with("/readme")));
    }

    #[tokio::test]
    async fn test_falls_back_to_readme() {
        let backend = FakeBackend::new()
            .with_json("/contents/package.json", encoded(r#"{"name": "no-tools"}"#))
            .with_json(
                "/contents/",
                json!([{"name": "package.json", "path": "package.json", "type": "file"}]),
            )
            .with_json("/readme", encoded("## Available Tools\n- **gamma**: third\n"));

        let tools = tier(backend).discover(&server()).await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "gamma");
        assert_eq!(tools[0].description, "third");
    }

    #[tokio::test]
    async fn test_missing_readme_means_no_tools() {
        let backend = FakeBackend::new().with_json("/contents/", json!([]));
        assert!(tier(backend).discover(&server()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_requires_github_url() {
        let err = tier(FakeBackend::new())
            .discover(&server_with(Some("https://x.example"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, TierError::NotApplicable(_)));
    }
}
