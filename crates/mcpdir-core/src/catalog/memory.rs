//! In-memory catalog.
//!
//! Backs the mock dataset served when no store is configured, and applies
//! the same filter, sort and pagination rules as the SQLite search.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;

use super::query::{CatalogQuery, SortField, SortOrder};
use super::SearchPage;
use crate::domain::{ChangelogEntry, CompatibilityEntry, HealthEntry, Server, ServerId, Tool};
use crate::ports::{CatalogReader, RepositoryError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    servers: Vec<Server>,
    tools: HashMap<ServerId, Vec<Tool>>,
    health: HashMap<ServerId, Vec<HealthEntry>>,
    changelog: HashMap<ServerId, Vec<ChangelogEntry>>,
    compatibility: HashMap<ServerId, Vec<CompatibilityEntry>>,
}

impl InMemoryCatalog {
    pub fn new(servers: Vec<Server>) -> Self {
        Self {
            servers,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Tool>) -> Self {
        for tool in tools {
            self.tools.entry(tool.server_id).or_default().push(tool);
        }
        self
    }

    #[must_use]
    pub fn with_health(mut self, entries: impl IntoIterator<Item = HealthEntry>) -> Self {
        for entry in entries {
            self.health.entry(entry.server_id).or_default().push(entry);
        }
        self
    }

    #[must_use]
    pub fn with_changelog(mut self, entries: impl IntoIterator<Item = ChangelogEntry>) -> Self {
        for entry in entries {
            self.changelog.entry(entry.server_id).or_default().push(entry);
        }
        self
    }

    #[must_use]
    pub fn with_compatibility(
        mut self,
        entries: impl IntoIterator<Item = CompatibilityEntry>,
    ) -> Self {
        for entry in entries {
            self.compatibility.entry(entry.server_id).or_default().push(entry);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Synchronous search used by the trait impl.
    pub fn search_servers(&self, query: &CatalogQuery) -> SearchPage {
        let mut matching: Vec<&Server> =
            self.servers.iter().filter(|s| matches(s, query)).collect();
        matching.sort_by(|a, b| compare(a, b, query.sort, query.order));

        let total = matching.len() as u64;
        let servers = matching
            .into_iter()
            .skip(usize::try_from(query.offset).unwrap_or(usize::MAX))
            .take(query.limit as usize)
            .cloned()
            .collect();
        SearchPage { servers, total }
    }

    fn find(&self, id_or_slug: &str) -> Option<&Server> {
        let id = id_or_slug.parse::<ServerId>().ok();
        self.servers
            .iter()
            .find(|s| Some(s.id) == id || s.slug == id_or_slug)
    }
}

/// Whether a server passes every filter in the query.
pub fn matches(server: &Server, query: &CatalogQuery) -> bool {
    if query.unknown_category {
        return false;
    }
    if let Some(category) = query.category {
        if server.category != category {
            return false;
        }
    }
    if let Some(tag) = &query.tag {
        if !server.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            return false;
        }
    }
    if let Some(platform) = &query.platform {
        if !server.platform.eq_ignore_ascii_case(platform) {
            return false;
        }
    }
    if let Some(q) = &query.q {
        let needle = q.to_lowercase();
        let hit = server.name.to_lowercase().contains(&needle)
            || server.description.to_lowercase().contains(&needle)
            || server.tags.iter().any(|t| t.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    true
}

/// Sort by the requested field, then by name and id ascending.
pub fn compare(a: &Server, b: &Server, sort: SortField, order: SortOrder) -> Ordering {
    let primary = match sort {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Stars => a.stars.cmp(&b.stars),
        SortField::Forks => a.forks.cmp(&b.forks),
        SortField::LastUpdated => a.last_updated.cmp(&b.last_updated),
        SortField::HealthStatus => a.health_status.rank().cmp(&b.health_status.rank()),
    };
    let primary = match order {
        SortOrder::Asc => primary,
        SortOrder::Desc => primary.reverse(),
    };
    primary
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn search(&self, query: &CatalogQuery) -> Result<SearchPage, RepositoryError> {
        Ok(self.search_servers(query))
    }

    async fn server(&self, id_or_slug: &str) -> Result<Server, RepositoryError> {
        self.find(id_or_slug)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("server {id_or_slug}")))
    }

    async fn tools(&self, server_id: ServerId) -> Result<Vec<Tool>, RepositoryError> {
        Ok(self.tools.get(&server_id).cloned().unwrap_or_default())
    }

    async fn health(
        &self,
        server_id: ServerId,
        limit: u32,
    ) -> Result<Vec<HealthEntry>, RepositoryError> {
        let mut entries = self.health.get(&server_id).cloned().unwrap_or_default();
        entries.sort_by(|a, b| b.checked_at.cmp(&a.checked_at));
        entries.truncate(limit as usize);
        Ok(entries)
    }

    async fn changelog(&self, server_id: ServerId) -> Result<Vec<ChangelogEntry>, RepositoryError> {
        let mut entries = self.changelog.get(&server_id).cloned().unwrap_or_default();
        entries.sort_by(|a, b| b.released_at.cmp(&a.released_at));
        Ok(entries)
    }

    async fn compatibility(
        &self,
        server_id: ServerId,
    ) -> Result<Vec<CompatibilityEntry>, RepositoryError> {
        Ok(self.compatibility.get(&server_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::domain::{Category, HealthStatus, InstallInstructions};

    fn server(name: &str, stars: i64, category: Category, tags: &[&str]) -> Server {
        let slug = name.to_lowercase();
        Server {
            id: ServerId::from_slug(&slug),
            slug,
            name: name.to_string(),
            description: format!("{name} server"),
            category,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            platform: "node".to_string(),
            install_method: "npm".to_string(),
            install_instructions: InstallInstructions::Missing,
            github_url: None,
            external_url: None,
            package_registry: None,
            package_name: None,
            stars,
            forks: 0,
            open_issues: 0,
            contributors: 0,
            health_status: HealthStatus::Unknown,
            tools_detection_source: None,
            last_updated: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            last_checked: None,
        }
    }

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new(vec![
            server("Alpha", 10, Category::Database, &["postgres", "sql"]),
            server("Bravo", 30, Category::Web, &["fetch"]),
            server("Charlie", 20, Category::Database, &["sqlite"]),
            server("Delta", 20, Category::Ai, &["llm"]),
        ])
    }

    fn names(page: &SearchPage) -> Vec<&str> {
        page.servers.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_default_sort_is_stars_desc_with_name_tiebreak() {
        let page = catalog().search_servers(&CatalogQuery::default());
        assert_eq!(names(&page), vec!["Bravo", "Charlie", "Delta", "Alpha"]);
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_filters() {
        let catalog = catalog();
        let query = CatalogQuery {
            category: Some(Category::Database),
            ..CatalogQuery::default()
        };
        assert_eq!(names(&catalog.search_servers(&query)), vec!["Charlie", "Alpha"]);

        let query = CatalogQuery {
            tag: Some("sqlite".into()),
            ..CatalogQuery::default()
        };
        assert_eq!(names(&catalog.search_servers(&query)), vec!["Charlie"]);

        let query = CatalogQuery {
            q: Some("POSTGRES".into()),
            ..CatalogQuery::default()
        };
        assert_eq!(names(&catalog.search_servers(&query)), vec!["Alpha"]);

        let query = CatalogQuery {
            unknown_category: true,
            ..CatalogQuery::default()
        };
        assert_eq!(catalog.search_servers(&query).total, 0);
    }

    #[test]
    fn test_pagination() {
        let query = CatalogQuery {
            limit: 2,
            offset: 1,
            sort: SortField::Name,
            order: SortOrder::Asc,
            ..CatalogQuery::default()
        };
        let page = catalog().search_servers(&query);
        assert_eq!(names(&page), vec!["Bravo", "Charlie"]);
        assert_eq!(page.total, 4);
        assert!(page.has_more(&query));

        let past_end = CatalogQuery {
            offset: 10,
            ..query
        };
        let page = catalog().search_servers(&past_end);
        assert!(page.servers.is_empty());
        assert!(!page.has_more(&past_end));
    }

    #[tokio::test]
    async fn test_reader_lookups_and_health_order() {
        let alpha = ServerId::from_slug("alpha");
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let catalog = catalog().with_health((0..7).map(|i| HealthEntry {
            server_id: alpha,
            status: HealthStatus::Online,
            response_time_ms: Some(i),
            checked_at: base + Duration::minutes(i),
        }));

        assert_eq!(catalog.server("alpha").await.unwrap().id, alpha);
        assert_eq!(catalog.server(&alpha.to_string()).await.unwrap().name, "Alpha");
        assert!(matches!(
            catalog.server("nope").await,
            Err(RepositoryError::NotFound(_))
        ));

        let recent = catalog.health(alpha, 5).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].response_time_ms, Some(6));
        assert!(catalog.tools(alpha).await.unwrap().is_empty());
    }
}
