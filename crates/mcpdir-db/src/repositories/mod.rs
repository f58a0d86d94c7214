//! Repository implementations using `SQLite`.
//!
//! These implementations encapsulate all SQL queries and database access.
//! The `SqlitePool` is confined to this module and never exposed through
//! the port trait signatures.

mod row_mappers;
mod sqlite_catalog_reader;
mod sqlite_health_repository;
mod sqlite_history_repository;
mod sqlite_server_repository;
mod sqlite_tool_repository;

pub use sqlite_catalog_reader::SqliteCatalogReader;
pub use sqlite_health_repository::SqliteHealthRepository;
pub use sqlite_history_repository::{SqliteChangelogRepository, SqliteCompatibilityRepository};
pub use sqlite_server_repository::SqliteServerRepository;
pub use sqlite_tool_repository::SqliteToolRepository;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};
    use mcpdir_core::{
        Category, HealthStatus, InstallInstructions, Server, ServerId, ServerRepository,
    };
    use sqlx::SqlitePool;

    use super::SqliteServerRepository;

    pub async fn test_pool() -> SqlitePool {
        crate::setup::setup_test_database().await.unwrap()
    }

    /// A server whose slug and name are both `slug`.
    pub fn server(slug: &str, stars: i64) -> Server {
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
            stars,
            forks: 0,
            open_issues: 0,
            contributors: 0,
            health_status: HealthStatus::Unknown,
            tools_detection_source: None,
            last_updated: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            last_checked: None,
        }
    }

    /// Pool with the given servers already stored.
    pub async fn pool_with(slugs: &[&str]) -> SqlitePool {
        let pool = test_pool().await;
        let repo = SqliteServerRepository::new(pool.clone());
        for slug in slugs {
            repo.upsert(&server(slug, 0)).await.unwrap();
        }
        pool
    }
}
