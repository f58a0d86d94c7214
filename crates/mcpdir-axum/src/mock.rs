//! Static catalog served when the store is unavailable.

use chrono::{DateTime, Duration, Utc};
use mcpdir_core::{
    Category, ChangelogEntry, CompatibilityEntry, DetectionSource, DiscoveredTool, HealthEntry,
    HealthStatus, HttpMethod, InMemoryCatalog, InstallInstructions, InstallStep, Server, ServerId,
    Tool,
};

/// 2025-06-01T00:00:00Z
const EPOCH_SECS: i64 = 1_748_736_000;

fn at(days_before: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(EPOCH_SECS, 0).unwrap_or_default() - Duration::days(days_before)
}

struct Seed {
    slug: &'static str,
    name: &'static str,
    description: &'static str,
    category: Category,
    tags: &'static [&'static str],
    platform: &'static str,
    install_method: &'static str,
    stars: i64,
    forks: i64,
    health: HealthStatus,
    external_url: Option<&'static str>,
    install: InstallInstructions,
    tools: &'static [(&'static str, &'static str)],
}

impl Seed {
    fn server(&self, index: i64) -> Server {
        Server {
            id: ServerId::from_slug(self.slug),
            slug: self.slug.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            category: self.category,
            tags: self.tags.iter().map(|t| (*t).to_string()).collect(),
            platform: self.platform.to_string(),
            install_method: self.install_method.to_string(),
            install_instructions: self.install.clone(),
            github_url: Some(format!("https://github.com/{}", self.slug)),
            external_url: self.external_url.map(str::to_string),
            package_registry: None,
            package_name: None,
            stars: self.stars,
            forks: self.forks,
            open_issues: index * 3,
            contributors: 4 + index,
            health_status: self.health,
            tools_detection_source: (!self.tools.is_empty())
                .then_some(DetectionSource::GithubRepository),
            last_updated: at(index * 5),
            last_checked: Some(at(0)),
        }
    }
}

fn npm(package: &str) -> InstallInstructions {
    InstallInstructions::Parsed(vec![
        InstallStep::new("Node.js", format!("npm install {package}")),
        InstallStep::new("Yarn", format!("yarn add {package}")),
    ])
}

fn pip(package: &str) -> InstallInstructions {
    InstallInstructions::Parsed(vec![InstallStep::new(
        "Python",
        format!("pip install {package}"),
    )])
}

fn seeds() -> Vec<Seed> {
    vec![
        Seed {
            slug: "modelcontextprotocol/filesystem",
            name: "Filesystem",
            description: "Read, write and search files in sandboxed directories",
            category: Category::Files,
            tags: &["files", "filesystem", "search"],
            platform: "node",
            install_method: "npm",
            stars: 4200,
            forks: 510,
            health: HealthStatus::Online,
            external_url: None,
            install: npm("@modelcontextprotocol/server-filesystem"),
            tools: &[
                ("read_file", "Read the contents of a file"),
                ("write_file", "Create or overwrite a file"),
                ("search_files", "Find files matching a pattern"),
            ],
        },
        Seed {
            slug: "acme/postgres-mcp",
            name: "Postgres Explorer",
            description: "Inspect schemas and run read-only queries against a database",
            category: Category::Database,
            tags: &["postgres", "sql", "database"],
            platform: "python",
            install_method: "pip",
            stars: 1830,
            forks: 140,
            health: HealthStatus::Online,
            external_url: Some("https://postgres-mcp.example.com"),
            install: pip("postgres-mcp"),
            tools: &[
                ("list_tables", "List tables in a schema"),
                ("query", "Run a read-only SQL query"),
            ],
        },
        Seed {
            slug: "acme/web-fetch",
            name: "Web Fetch",
            description: "Fetch web pages over HTTP and convert them to markdown",
            category: Category::Web,
            tags: &["web", "http", "markdown"],
            platform: "node",
            install_method: "npm",
            stars: 960,
            forks: 75,
            health: HealthStatus::Degraded,
            external_url: Some("https://fetch.example.com"),
            install: npm("@acme/web-fetch"),
            tools: &[("fetch", "Fetch a URL and return markdown")],
        },
        Seed {
            slug: "acme/oauth-gateway",
            name: "OAuth Gateway",
            description: "Auth helper that brokers OAuth login flows for agents",
            category: Category::Auth,
            tags: &["oauth", "login", "tokens"],
            platform: "go",
            install_method: "go",
            stars: 410,
            forks: 22,
            health: HealthStatus::Maintenance,
            external_url: Some("https://oauth-gateway.example.com"),
            install: InstallInstructions::Parsed(vec![InstallStep::new(
                "Go",
                "go get github.com/acme/oauth-gateway",
            )]),
            tools: &[],
        },
        Seed {
            slug: "acme/prompt-lab",
            name: "Prompt Lab",
            description: "Compare prompts across ai models and score the answers",
            category: Category::Ai,
            tags: &["prompts", "llm", "evaluation"],
            platform: "python",
            install_method: "pip",
            stars: 275,
            forks: 19,
            health: HealthStatus::Unknown,
            external_url: None,
            install: InstallInstructions::Raw(
                "Clone the repository and run `make install`".to_string(),
            ),
            tools: &[("compare", "Run a prompt against several models")],
        },
        Seed {
            slug: "acme/weather",
            name: "Weather",
            description: "Current conditions and forecasts for any city",
            category: Category::Other,
            tags: &["weather", "forecast"],
            platform: "any",
            install_method: "manual",
            stars: 88,
            forks: 9,
            health: HealthStatus::Offline,
            external_url: Some("https://weather.example.com"),
            install: InstallInstructions::Missing,
            tools: &[],
        },
    ]
}

fn tools_for(server: &Server, seed: &Seed) -> Vec<Tool> {
    seed.tools
        .iter()
        .map(|(name, description)| {
            let mut tool = DiscoveredTool::named(*name).with_description(*description);
            tool.method = HttpMethod::Post;
            Tool::from_discovered(server.id, DetectionSource::GithubRepository, tool)
        })
        .collect()
}

fn health_for(server: &Server) -> Vec<HealthEntry> {
    (0..6)
        .map(|hours| HealthEntry {
            server_id: server.id,
            status: server.health_status,
            response_time_ms: (server.health_status != HealthStatus::Offline)
                .then_some(120 + hours * 15),
            checked_at: at(0) - Duration::hours(hours),
        })
        .collect()
}

fn changelog_for(server: &Server) -> Vec<ChangelogEntry> {
    [("1.0.0", 90), ("1.1.0", 30)]
        .into_iter()
        .map(|(version, days)| ChangelogEntry {
            server_id: server.id,
            version: version.to_string(),
            title: format!("{} {version}", server.name),
            body: String::new(),
            released_at: at(days),
        })
        .collect()
}

fn compatibility_for(server: &Server) -> Vec<CompatibilityEntry> {
    ["Claude Desktop", "Cursor"]
        .into_iter()
        .map(|client| CompatibilityEntry {
            server_id: server.id,
            client: client.to_string(),
            platform: server.platform.clone(),
            status: "supported".to_string(),
            notes: None,
        })
        .collect()
}

/// The mock dataset.
pub fn mock_catalog() -> InMemoryCatalog {
    let seeds = seeds();
    let mut servers = Vec::with_capacity(seeds.len());
    let mut tools = Vec::new();
    let mut health = Vec::new();
    let mut changelog = Vec::new();
    let mut compatibility = Vec::new();

    for (index, seed) in (0_i64..).zip(&seeds) {
        let server = seed.server(index);
        tools.extend(tools_for(&server, seed));
        health.extend(health_for(&server));
        changelog.extend(changelog_for(&server));
        compatibility.extend(compatibility_for(&server));
        servers.push(server);
    }

    InMemoryCatalog::new(servers)
        .with_tools(tools)
        .with_health(health)
        .with_changelog(changelog)
        .with_compatibility(compatibility)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpdir_core::{CatalogQuery, CatalogReader};

    #[test]
    fn test_mock_covers_every_install_shape() {
        let catalog = mock_catalog();
        let page = catalog.search_servers(&CatalogQuery::default());
        assert_eq!(page.total, 6);
        assert!(page.servers.iter().any(|s| matches!(s.install_instructions, InstallInstructions::Raw(_))));
        assert!(page.servers.iter().any(|s| s.install_instructions.is_missing()));
    }

    #[tokio::test]
    async fn test_mock_health_is_capped_newest_first() {
        let catalog = mock_catalog();
        let id = ServerId::from_slug("acme/web-fetch");
        let recent = catalog.health(id, 5).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert!(recent[0].checked_at > recent[1].checked_at);
    }
}
