//! Read-side catalog over the `SQLite` repositories.

use async_trait::async_trait;
use sqlx::SqlitePool;

use mcpdir_core::{
    CatalogQuery, CatalogReader, ChangelogEntry, ChangelogRepository, CompatibilityEntry,
    CompatibilityRepository, HealthEntry, HealthRepository, RepositoryError, SearchPage, Server,
    ServerId, ServerRepository, Tool, ToolRepository,
};

use super::{
    SqliteChangelogRepository, SqliteCompatibilityRepository, SqliteHealthRepository,
    SqliteServerRepository, SqliteToolRepository,
};

pub struct SqliteCatalogReader {
    servers: SqliteServerRepository,
    tools: SqliteToolRepository,
    health: SqliteHealthRepository,
    changelog: SqliteChangelogRepository,
    compatibility: SqliteCompatibilityRepository,
}

impl SqliteCatalogReader {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            servers: SqliteServerRepository::new(pool.clone()),
            tools: SqliteToolRepository::new(pool.clone()),
            health: SqliteHealthRepository::new(pool.clone()),
            changelog: SqliteChangelogRepository::new(pool.clone()),
            compatibility: SqliteCompatibilityRepository::new(pool),
        }
    }
}

#[async_trait]
impl CatalogReader for SqliteCatalogReader {
    async fn search(&self, query: &CatalogQuery) -> Result<SearchPage, RepositoryError> {
        self.servers.search(query).await
    }

    async fn server(&self, id_or_slug: &str) -> Result<Server, RepositoryError> {
        self.servers.get(id_or_slug).await
    }

    async fn tools(&self, server_id: ServerId) -> Result<Vec<Tool>, RepositoryError> {
        self.tools.list_for_server(server_id).await
    }

    async fn health(
        &self,
        server_id: ServerId,
        limit: u32,
    ) -> Result<Vec<HealthEntry>, RepositoryError> {
        self.health.recent(server_id, limit).await
    }

    async fn changelog(&self, server_id: ServerId) -> Result<Vec<ChangelogEntry>, RepositoryError> {
        self.changelog.list_for_server(server_id).await
    }

    async fn compatibility(
        &self,
        server_id: ServerId,
    ) -> Result<Vec<CompatibilityEntry>, RepositoryError> {
        self.compatibility.list_for_server(server_id).await
    }
}
