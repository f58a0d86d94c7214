//! Upstream server catalog (PulseMCP) port.

use async_trait::async_trait;

use super::CoreError;
use crate::domain::InstallStep;

/// A server record as the upstream catalog describes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamServer {
    pub name: String,
    pub short_description: Option<String>,
    /// Machine-written long description, used when the short one is empty.
    pub ai_description: Option<String>,
    pub source_code_url: Option<String>,
    pub external_url: Option<String>,
    pub github_stars: Option<i64>,
    pub package_registry: Option<String>,
    pub package_name: Option<String>,
    pub package_download_count: Option<i64>,
    pub install_instructions: Vec<InstallStep>,
}

/// One page of the upstream listing.
#[derive(Debug, Clone, Default)]
pub struct CatalogPage {
    pub servers: Vec<UpstreamServer>,
    /// URL of the next page, if upstream reports one.
    pub next: Option<String>,
    pub total_count: u64,
}

/// Paginated read access to the upstream catalog.
#[async_trait]
pub trait ServerCatalogPort: Send + Sync {
    /// Number of servers upstream currently lists.
    async fn total_count(&self) -> Result<u64, CoreError>;

    /// Fetch `count` servers starting at `offset`.
    async fn fetch_page(&self, offset: u64, count: u32) -> Result<CatalogPage, CoreError>;
}
