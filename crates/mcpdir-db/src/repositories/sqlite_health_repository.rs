//! `SQLite` implementation of the append-only health history.

use async_trait::async_trait;
use sqlx::SqlitePool;

use mcpdir_core::{HealthEntry, HealthRepository, RepositoryError, ServerId};

use super::row_mappers::{HealthRow, format_timestamp, map_sqlx_error};

pub struct SqliteHealthRepository {
    pool: SqlitePool,
}

impl SqliteHealthRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthRepository for SqliteHealthRepository {
    async fn record(&self, entry: &HealthEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO server_health (server_id, status, response_time_ms, checked_at) VALUES (?, ?, ?, ?)",
        )
        .bind(entry.server_id.to_string())
        .bind(entry.status.as_str())
        .bind(entry.response_time_ms)
        .bind(format_timestamp(&entry.checked_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn recent(
        &self,
        server_id: ServerId,
        limit: u32,
    ) -> Result<Vec<HealthEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, HealthRow>(
            r#"
            SELECT server_id, status, response_time_ms, checked_at
            FROM server_health
            WHERE server_id = ?
            ORDER BY checked_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(server_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(HealthEntry::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures::pool_with;
    use chrono::{Duration, TimeZone, Utc};
    use mcpdir_core::{HealthStatus, RECENT_HEALTH_LIMIT};

    #[tokio::test]
    async fn test_recent_is_newest_first_and_capped() {
        let repo = SqliteHealthRepository::new(pool_with(&["alpha"]).await);
        let id = ServerId::from_slug("alpha");
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        for minutes in 0..8 {
            repo.record(&HealthEntry {
                server_id: id,
                status: if minutes % 2 == 0 {
                    HealthStatus::Online
                } else {
                    HealthStatus::Degraded
                },
                response_time_ms: Some(100 + minutes),
                checked_at: start + Duration::minutes(minutes),
            })
            .await
            .unwrap();
        }

        let recent = repo.recent(id, RECENT_HEALTH_LIMIT).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].checked_at, start + Duration::minutes(7));
        assert_eq!(recent[0].status, HealthStatus::Degraded);
        assert_eq!(recent[4].response_time_ms, Some(103));
    }

    #[tokio::test]
    async fn test_offline_entry_without_timing() {
        let repo = SqliteHealthRepository::new(pool_with(&["alpha"]).await);
        let id = ServerId::from_slug("alpha");
        let entry = HealthEntry {
            server_id: id,
            status: HealthStatus::Offline,
            response_time_ms: None,
            checked_at: Utc::now(),
        };

        repo.record(&entry).await.unwrap();
        assert_eq!(repo.recent(id, 5).await.unwrap(), vec![entry]);
    }

    #[tokio::test]
    async fn test_record_requires_known_server() {
        let repo = SqliteHealthRepository::new(pool_with(&[]).await);
        let err = repo
            .record(&HealthEntry {
                server_id: ServerId::from_slug("ghost"),
                status: HealthStatus::Online,
                response_time_ms: Some(1),
                checked_at: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Constraint(_)));
    }
}
