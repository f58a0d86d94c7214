//! GitHub REST client.
//!
//! Covers what enrichment and the repository detection tier need:
//! repository statistics, the contributor count, the root listing and
//! base64-encoded file contents.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mcpdir_core::normalize::github_owner_repo;
use mcpdir_core::{CoreError, RepoStats, RepoStatsPort};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::RemoteConfig;
use crate::error::{RemoteError, RemoteResult};
use crate::http::{HttpBackend, ReqwestBackend};
use crate::url::{
    build_contents_url, build_contributors_url, build_readme_url, build_repo_url, parse_base,
};

/// Owner and name of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Parse any GitHub URL form (`https`, `git@`, with or without `.git`).
    pub fn from_url(url: &str) -> Option<Self> {
        github_owner_repo(url).map(|(owner, repo)| Self { owner, repo })
    }
}

/// One entry of a contents listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    #[serde(default)]
    stargazers_count: i64,
    #[serde(default)]
    forks_count: i64,
    #[serde(default)]
    open_issues_count: i64,
}

#[derive(Debug, Deserialize)]
struct FileContent {
    content: Option<String>,
    encoding: Option<String>,
}

/// Decode the `content` field of a contents API response.
fn decode_content(file: &FileContent) -> RemoteResult<String> {
    let content = file
        .content
        .as_deref()
        .ok_or_else(|| RemoteError::invalid("file has no content"))?;
    if file.encoding.as_deref().is_some_and(|e| e != "base64") {
        return Ok(content.to_string());
    }
    // GitHub wraps base64 at 60 columns.
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| RemoteError::invalid(format!("bad base64 content: {e}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ============================================================================
// Client
// ============================================================================

/// Default GitHub client using the reqwest backend.
pub type DefaultGithubClient = GithubClient<ReqwestBackend>;

pub struct GithubClient<B: HttpBackend> {
    backend: B,
    api_url: Url,
}

impl DefaultGithubClient {
    /// Sends the configured token, if any.
    pub fn new(config: &RemoteConfig) -> RemoteResult<Self> {
        Ok(Self {
            backend: ReqwestBackend::for_github(config)?,
            api_url: parse_base(&config.github_api_url)?,
        })
    }
}

impl<B: HttpBackend> GithubClient<B> {
    pub const fn with_backend(api_url: Url, backend: B) -> Self {
        Self { backend, api_url }
    }

    /// Stars, forks, open issues and contributors.
    ///
    /// Contributors are counted from the first page of 100; larger projects
    /// report 100.
    pub async fn repo_stats(&self, repo: &RepoRef) -> RemoteResult<RepoStats> {
        let info: RepoInfo = self
            .backend
            .get_json(&build_repo_url(&self.api_url, &repo.owner, &repo.repo))
            .await?;
        let contributors: Vec<Value> = self
            .backend
            .get_json(&build_contributors_url(&self.api_url, &repo.owner, &repo.repo))
            .await?;

        Ok(RepoStats {
            stars: info.stargazers_count,
            forks: info.forks_count,
            open_issues: info.open_issues_count,
            contributors: i64::try_from(contributors.len()).unwrap_or(i64::MAX),
        })
    }

    /// Root directory listing.
    pub async fn root_contents(&self, repo: &RepoRef) -> RemoteResult<Vec<ContentEntry>> {
        self.backend
            .get_json(&build_contents_url(&self.api_url, &repo.owner, &repo.repo, ""))
            .await
    }

    /// Decoded README text.
    pub async fn readme(&self, repo: &RepoRef) -> RemoteResult<String> {
        let file: FileContent = self
            .backend
            .get_json(&build_readme_url(&self.api_url, &repo.owner, &repo.repo))
            .await?;
        decode_content(&file)
    }

    /// Decoded text of a file in the default branch.
    pub async fn file(&self, repo: &RepoRef, path: &str) -> RemoteResult<String> {
        let file: FileContent = self
            .backend
            .get_json(&build_contents_url(&self.api_url, &repo.owner, &repo.repo, path))
            .await?;
        decode_content(&file)
    }
}

#[async_trait]
impl<B: HttpBackend> RepoStatsPort for GithubClient<B> {
    async fn fetch(&self, github_url: &str) -> Result<RepoStats, CoreError> {
        let repo = RepoRef::from_url(github_url)
            .ok_or_else(|| CoreError::Validation(format!("not a GitHub URL: {github_url}")))?;
        Ok(self.repo_stats(&repo).await?)
    }
}
