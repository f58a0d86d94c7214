//! `SQLite` implementations of the changelog and compatibility tables.
//!
//! Both are append-only; nothing in the system edits or prunes them.

use async_trait::async_trait;
use sqlx::SqlitePool;

use mcpdir_core::{
    ChangelogEntry, ChangelogRepository, CompatibilityEntry, CompatibilityRepository,
    RepositoryError, ServerId,
};

use super::row_mappers::{ChangelogRow, CompatibilityRow, format_timestamp, map_sqlx_error};

pub struct SqliteChangelogRepository {
    pool: SqlitePool,
}

impl SqliteChangelogRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChangelogRepository for SqliteChangelogRepository {
    async fn append(&self, entry: &ChangelogEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO server_changelog (server_id, version, title, body, released_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(entry.server_id.to_string())
        .bind(&entry.version)
        .bind(&entry.title)
        .bind(&entry.body)
        .bind(format_timestamp(&entry.released_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn list_for_server(
        &self,
        server_id: ServerId,
    ) -> Result<Vec<ChangelogEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, ChangelogRow>(
            r#"
            SELECT server_id, version, title, body, released_at
            FROM server_changelog
            WHERE server_id = ?
            ORDER BY released_at DESC, id DESC
            "#,
        )
        .bind(server_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(ChangelogEntry::try_from).collect()
    }
}

pub struct SqliteCompatibilityRepository {
    pool: SqlitePool,
}

impl SqliteCompatibilityRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompatibilityRepository for SqliteCompatibilityRepository {
    async fn append(&self, entry: &CompatibilityEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO server_compatibility (server_id, client, platform, status, notes) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(entry.server_id.to_string())
        .bind(&entry.client)
        .bind(&entry.platform)
        .bind(&entry.status)
        .bind(&entry.notes)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Insertion order.
    async fn list_for_server(
        &self,
        server_id: ServerId,
    ) -> Result<Vec<CompatibilityEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, CompatibilityRow>(
            r#"
            SELECT server_id, client, platform, status, notes
            FROM server_compatibility
            WHERE server_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(server_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(CompatibilityEntry::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures::pool_with;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_changelog_newest_release_first() {
        let repo = SqliteChangelogRepository::new(pool_with(&["alpha"]).await);
        let id = ServerId::from_slug("alpha");
        for (version, month) in [("1.0.0", 1), ("1.2.0", 5), ("1.1.0", 3)] {
            repo.append(&ChangelogEntry {
                server_id: id,
                version: version.into(),
                title: format!("Release {version}"),
                body: String::new(),
                released_at: Utc.with_ymd_and_hms(2025, month, 1, 0, 0, 0).unwrap(),
            })
            .await
            .unwrap();
        }

        let versions: Vec<String> = repo
            .list_for_server(id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.version)
            .collect();
        assert_eq!(versions, vec!["1.2.0", "1.1.0", "1.0.0"]);
    }

    #[tokio::test]
    async fn test_compatibility_keeps_insertion_order() {
        let repo = SqliteCompatibilityRepository::new(pool_with(&["alpha", "bravo"]).await);
        let alpha = ServerId::from_slug("alpha");
        for client in ["Claude Desktop", "Cursor"] {
            repo.append(&CompatibilityEntry {
                server_id: alpha,
                client: client.into(),
                platform: "macos".into(),
                status: "supported".into(),
                notes: None,
            })
            .await
            .unwrap();
        }

        let clients: Vec<String> = repo
            .list_for_server(alpha)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.client)
            .collect();
        assert_eq!(clients, vec!["Claude Desktop", "Cursor"]);
        assert!(
            repo.list_for_server(ServerId::from_slug("bravo"))
                .await
                .unwrap()
                .is_empty()
        );
    }
}
