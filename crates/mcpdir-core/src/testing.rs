//! In-memory fakes shared by unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::catalog::{CatalogQuery, InMemoryCatalog, SearchPage};
use crate::domain::{
    Category, DetectionSource, HealthEntry, HealthStatus, InstallInstructions, RepoStats, Server,
    ServerId, Tool,
};
use crate::ports::{
    CatalogPage, CoreError, HealthRepository, Pacer, RepositoryError, ServerCatalogPort,
    ServerRepository, ToolRepository, UpsertOutcome, UpstreamServer,
};

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// A server whose slug and name are both `slug`.
pub fn sample_server(slug: &str) -> Server {
    Server {
        id: ServerId::from_slug(slug),
        slug: slug.to_string(),
        name: slug.to_string(),
        description: String::new(),
        category: Category::Other,
        tags: Vec::new(),
        platform: "any".to_string(),
        install_method: "manual".to_string(),
        install_instructions: InstallInstructions::Missing,
        github_url: None,
        external_url: None,
        package_registry: None,
        package_name: None,
        stars: 0,
        forks: 0,
        open_issues: 0,
        contributors: 0,
        health_status: HealthStatus::Unknown,
        tools_detection_source: None,
        last_updated: fixed_time(),
        last_checked: None,
    }
}

/// Records every pause instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.pauses.lock().unwrap().push(delay);
    }
}

/// Upstream catalog serving `count` generated servers.
pub struct FakeUpstream {
    pub servers: Vec<UpstreamServer>,
}

impl FakeUpstream {
    pub fn generated(count: usize) -> Self {
        let servers = (0..count)
            .map(|i| UpstreamServer {
                name: format!("Server {i}"),
                short_description: Some(format!("Fetches web page number {i}")),
                source_code_url: Some(format!("https://github.com/acme/server-{i}")),
                github_stars: Some(i64::try_from(i).unwrap()),
                ..UpstreamServer::default()
            })
            .collect();
        Self { servers }
    }
}

#[async_trait]
impl ServerCatalogPort for FakeUpstream {
    async fn total_count(&self) -> Result<u64, CoreError> {
        Ok(self.servers.len() as u64)
    }

    async fn fetch_page(&self, offset: u64, count: u32) -> Result<CatalogPage, CoreError> {
        let start = usize::try_from(offset).unwrap().min(self.servers.len());
        let end = (start + count as usize).min(self.servers.len());
        Ok(CatalogPage {
            servers: self.servers[start..end].to_vec(),
            next: None,
            total_count: self.servers.len() as u64,
        })
    }
}

/// Store backing servers, tools and health in memory.
#[derive(Default)]
pub struct MemoryStore {
    pub servers: Mutex<BTreeMap<String, Server>>,
    pub tools: Mutex<BTreeMap<ServerId, Vec<Tool>>>,
    pub health: Mutex<Vec<HealthEntry>>,
}

impl MemoryStore {
    pub fn with_servers(servers: impl IntoIterator<Item = Server>) -> Self {
        let store = Self::default();
        {
            let mut map = store.servers.lock().unwrap();
            for server in servers {
                map.insert(server.slug.clone(), server);
            }
        }
        store
    }

    pub fn server(&self, slug: &str) -> Server {
        self.servers.lock().unwrap()[slug].clone()
    }

    fn modify(&self, id: ServerId, f: impl FnOnce(&mut Server)) -> Result<(), RepositoryError> {
        let mut map = self.servers.lock().unwrap();
        let server = map
            .values_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        f(server);
        Ok(())
    }
}

#[async_trait]
impl ServerRepository for MemoryStore {
    async fn upsert(&self, server: &Server) -> Result<UpsertOutcome, RepositoryError> {
        let mut map = self.servers.lock().unwrap();
        match map.get_mut(&server.slug) {
            Some(existing) => {
                let kept = existing.clone();
                *existing = Server {
                    health_status: kept.health_status,
                    tools_detection_source: kept.tools_detection_source,
                    forks: kept.forks,
                    open_issues: kept.open_issues,
                    contributors: kept.contributors,
                    last_checked: kept.last_checked,
                    ..server.clone()
                };
                Ok(UpsertOutcome::Updated)
            }
            None => {
                map.insert(server.slug.clone(), server.clone());
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    async fn get(&self, id_or_slug: &str) -> Result<Server, RepositoryError> {
        let map = self.servers.lock().unwrap();
        map.values()
            .find(|s| s.slug == id_or_slug || s.id.to_string() == id_or_slug)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id_or_slug.to_string()))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.servers.lock().unwrap().len() as u64)
    }

    async fn list_page(&self, offset: u64, limit: u32) -> Result<Vec<Server>, RepositoryError> {
        Ok(self
            .servers
            .lock()
            .unwrap()
            .values()
            .skip(usize::try_from(offset).unwrap())
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn search(&self, query: &CatalogQuery) -> Result<SearchPage, RepositoryError> {
        let servers: Vec<Server> = self.servers.lock().unwrap().values().cloned().collect();
        Ok(InMemoryCatalog::new(servers).search_servers(query))
    }

    async fn update_health(
        &self,
        id: ServerId,
        status: HealthStatus,
        checked_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.modify(id, |s| {
            s.health_status = status;
            s.last_checked = Some(checked_at);
        })
    }

    async fn update_repo_stats(
        &self,
        id: ServerId,
        stats: RepoStats,
    ) -> Result<(), RepositoryError> {
        self.modify(id, |s| {
            s.stars = stats.stars;
            s.forks = stats.forks;
            s.open_issues = stats.open_issues;
            s.contributors = stats.contributors;
        })
    }
}

#[async_trait]
impl ToolRepository for MemoryStore {
    async fn replace_tools(
        &self,
        server_id: ServerId,
        source: DetectionSource,
        tools: &[Tool],
    ) -> Result<(), RepositoryError> {
        self.modify(server_id, |s| s.tools_detection_source = Some(source))?;
        self.tools.lock().unwrap().insert(server_id, tools.to_vec());
        Ok(())
    }

    async fn list_for_server(&self, server_id: ServerId) -> Result<Vec<Tool>, RepositoryError> {
        Ok(self
            .tools
            .lock()
            .unwrap()
            .get(&server_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl HealthRepository for MemoryStore {
    async fn record(&self, entry: &HealthEntry) -> Result<(), RepositoryError> {
        self.health.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn recent(
        &self,
        server_id: ServerId,
        limit: u32,
    ) -> Result<Vec<HealthEntry>, RepositoryError> {
        let mut entries: Vec<_> = self
            .health
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.server_id == server_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.checked_at.cmp(&a.checked_at));
        entries.truncate(limit as usize);
        Ok(entries)
    }
}
