//! PulseMCP directory client.
//!
//! `GET /v0beta/servers?offset=&count_per_page=` returns
//! `{servers: [...], next, total_count}`. Records are parsed leniently: a
//! server without a name is kept with an empty name for the sync job to
//! skip, and one bad field never fails the whole page.

use async_trait::async_trait;
use mcpdir_core::{CatalogPage, CoreError, InstallStep, ServerCatalogPort, UpstreamServer};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::RemoteConfig;
use crate::error::{RemoteError, RemoteResult};
use crate::http::{HttpBackend, ReqwestBackend};
use crate::url::{build_servers_url, parse_base};

/// Default page size used by the sync job.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

// ============================================================================
// Parsing
// ============================================================================

fn string_field(json: &Value, key: &str) -> Option<String> {
    json.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Integers sometimes arrive as strings.
fn int_field(json: &Value, key: &str) -> Option<i64> {
    match json.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_install_steps(json: &Value) -> Vec<InstallStep> {
    json.get("install_instructions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let command = string_field(item, "install_command")
                        .or_else(|| string_field(item, "command"))?;
                    Some(InstallStep {
                        platform: string_field(item, "platform")
                            .unwrap_or_else(|| "Generic".to_string()),
                        icon_url: string_field(item, "icon_url"),
                        command,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse one server object. `None` when it has no name.
pub fn parse_server(json: &Value) -> Option<UpstreamServer> {
    let server = parse_record(json);
    (!server.name.is_empty()).then_some(server)
}

/// Parse one server object, leaving `name` empty when upstream omits it.
fn parse_record(json: &Value) -> UpstreamServer {
    UpstreamServer {
        name: string_field(json, "name").unwrap_or_default(),
        short_description: string_field(json, "short_description"),
        ai_description: string_field(json, "EXPERIMENTAL_ai_generated_description"),
        source_code_url: string_field(json, "source_code_url"),
        external_url: string_field(json, "external_url"),
        github_stars: int_field(json, "github_stars"),
        package_registry: string_field(json, "package_registry"),
        package_name: string_field(json, "package_name"),
        package_download_count: int_field(json, "package_download_count"),
        install_instructions: parse_install_steps(json),
    }
}

/// Parse a listing page.
pub fn parse_page(json: &Value) -> RemoteResult<CatalogPage> {
    let servers = json
        .get("servers")
        .and_then(Value::as_array)
        .ok_or_else(|| RemoteError::invalid("missing 'servers' array"))?;

    // Nameless records stay on the page so the sync job can count them.
    let parsed: Vec<UpstreamServer> = servers.iter().map(parse_record).collect();
    let nameless = parsed.iter().filter(|s| s.name.is_empty()).count();
    if nameless > 0 {
        warn!(nameless, "Upstream page contains records without a name");
    }

    let total_count = int_field(json, "total_count")
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(parsed.len() as u64);

    Ok(CatalogPage {
        servers: parsed,
        next: string_field(json, "next"),
        total_count,
    })
}

// ============================================================================
// Client
// ============================================================================

/// Default PulseMCP client using the reqwest backend.
pub type DefaultPulseClient = PulseClient<ReqwestBackend>;

pub struct PulseClient<B: HttpBackend> {
    backend: B,
    base_url: Url,
}

impl DefaultPulseClient {
    pub fn new(config: &RemoteConfig) -> RemoteResult<Self> {
        Ok(Self {
            backend: ReqwestBackend::new(config)?,
            base_url: parse_base(&config.pulse_base_url)?,
        })
    }
}

impl<B: HttpBackend> PulseClient<B> {
    /// Create a client with a custom backend.
    pub const fn with_backend(base_url: Url, backend: B) -> Self {
        Self { backend, base_url }
    }

    pub async fn page(&self, offset: u64, count: u32) -> RemoteResult<CatalogPage> {
        let url = build_servers_url(&self.base_url, offset, count);
        debug!(%url, "Fetching PulseMCP page");
        let json: Value = self.backend.get_json(&url).await?;
        parse_page(&json)
    }
}

#[async_trait]
impl<B: HttpBackend> ServerCatalogPort for PulseClient<B> {
    async fn total_count(&self) -> Result<u64, CoreError> {
        Ok(self.page(0, 1).await?.total_count)
    }

    async fn fetch_page(&self, offset: u64, count: u32) -> Result<CatalogPage, CoreError> {
        Ok(self.page(offset, count).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use mcpdir_core::{BatchConfig, BatchRunner, SyncJob};
    use serde_json::json;

    fn client(backend: FakeBackend) -> PulseClient<FakeBackend> {
        PulseClient::with_backend(Url::parse("https://api.pulsemcp.com").unwrap(), backend)
    }

    #[test]
    fn test_parse_server_fields() {
        let server = parse_server(&json!({
            "name": " GitHub ",
            "short_description": "Repos and issues",
            "EXPERIMENTAL_ai_generated_description": "Long text",
            "source_code_url": "https://github.com/github/github-mcp-server",
            "external_url": "https://github.example/mcp",
            "github_stars": "1532",
            "package_registry": "npm",
            "package_name": "@github/mcp",
            "package_download_count": 9000,
            "install_instructions": [
                {"platform": "Node.js", "icon_url": "https://x/n.svg", "install_command": "npx -y @github/mcp"},
                {"platform": "Broken"}
            ]
        }))
        .unwrap();

        assert_eq!(server.name, "GitHub");
        assert_eq!(server.github_stars, Some(1532));
        assert_eq!(server.package_download_count, Some(9000));
        assert_eq!(server.ai_description.as_deref(), Some("Long text"));
        assert_eq!(server.install_instructions.len(), 1);
        assert_eq!(server.install_instructions[0].command, "npx -y @github/mcp");
    }

    #[test]
    fn test_parse_page_keeps_nameless_records() {
        let page = parse_page(&json!({
            "servers": [{"name": "A"}, {"short_description": "no name"}, {"name": ""}],
            "next": "https://api.pulsemcp.com/v0beta/servers?offset=3",
            "total_count": 250
        }))
        .unwrap();
        assert_eq!(page.servers.len(), 3);
        assert_eq!(page.servers[1].name, "");
        assert_eq!(page.servers[1].short_description.as_deref(), Some("no name"));
        assert_eq!(page.total_count, 250);
        assert!(page.next.is_some());

        assert!(parse_server(&json!({"name": "  "})).is_none());
        assert!(parse_page(&json!({"items": []})).is_err());
    }

    #[tokio::test]
    async fn test_sync_counts_nameless_records_as_skipped() {
        let backend = FakeBackend::new().with_json(
            "servers",
            json!({
                "servers": [
                    {"name": "Weather", "source_code_url": "https://github.com/acme/weather"},
                    {"short_description": "no name"},
                    {"name": "   "}
                ],
                "total_count": 3
            }),
        );
        let pool = mcpdir_db::setup_test_database().await.unwrap();
        let repos = mcpdir_db::CatalogFactory::build_repos(pool);
        let job = SyncJob::new(Arc::new(client(backend)), repos.servers.clone());
        let runner = BatchRunner::new(
            BatchConfig::default()
                .with_batch_size(10)
                .with_delay(Duration::ZERO),
        );

        let report = runner.run(&job).await.unwrap();
        assert_eq!(report.totals.added, 1);
        assert_eq!(report.totals.skipped, 2);
        assert_eq!(
            report
                .outcomes
                .iter()
                .filter(|o| o.detail.as_deref() == Some("missing name"))
                .count(),
            2
        );
        assert_eq!(repos.servers.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_total_count_and_page_urls() {
        let backend = FakeBackend::new()
            .with_json("offset=0&count_per_page=1", json!({"servers": [{"name": "A"}], "total_count": 25}))
            .with_json("offset=10&count_per_page=10", json!({"servers": [{"name": "K"}], "total_count": 25}));
        let client = client(backend.clone());

        assert_eq!(client.total_count().await.unwrap(), 25);
        let page = client.fetch_page(10, 10).await.unwrap();
        assert_eq!(page.servers[0].name, "K");
        assert_eq!(
            backend.requests()[1],
            "https://api.pulsemcp.com/v0beta/servers?offset=10&count_per_page=10"
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_maps_to_core_error() {
        let backend = FakeBackend::new().with_response("servers", CannedResponse::Status(502));
        let err = client(backend).total_count().await.unwrap_err();
        assert!(matches!(err, CoreError::Upstream(msg) if msg.contains("502")));
    }
}
