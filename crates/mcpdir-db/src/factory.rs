//! Composition utilities for wiring the core with `SQLite` backends.
//!
//! Construction only; no domain logic lives here.

use sqlx::SqlitePool;
use std::sync::Arc;

use mcpdir_core::Repos;

use crate::repositories::{
    SqliteCatalogReader, SqliteChangelogRepository, SqliteCompatibilityRepository,
    SqliteHealthRepository, SqliteServerRepository, SqliteToolRepository,
};

/// Factory for repository instances backed by one pool.
pub struct CatalogFactory;

impl CatalogFactory {
    /// Build every repository the jobs need.
    pub fn build_repos(pool: SqlitePool) -> Repos {
        Repos {
            servers: Arc::new(SqliteServerRepository::new(pool.clone())),
            tools: Arc::new(SqliteToolRepository::new(pool.clone())),
            health: Arc::new(SqliteHealthRepository::new(pool.clone())),
            changelog: Arc::new(SqliteChangelogRepository::new(pool.clone())),
            compatibility: Arc::new(SqliteCompatibilityRepository::new(pool)),
        }
    }

    /// Read-side facade for the HTTP handlers.
    pub fn catalog_reader(pool: SqlitePool) -> Arc<SqliteCatalogReader> {
        Arc::new(SqliteCatalogReader::new(pool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup_test_database;
    use mcpdir_core::CatalogReader;

    #[tokio::test]
    async fn test_repos_share_the_pool() {
        let pool = setup_test_database().await.unwrap();
        let repos = CatalogFactory::build_repos(pool.clone());
        let reader = CatalogFactory::catalog_reader(pool);

        assert_eq!(repos.servers.count().await.unwrap(), 0);
        assert_eq!(
            reader
                .search(&mcpdir_core::CatalogQuery::default())
                .await
                .unwrap()
                .total,
            0
        );
    }
}
