//! `SQLite` implementation of the tool repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use mcpdir_core::{DetectionSource, RepositoryError, ServerId, Tool, ToolRepository};

use super::row_mappers::{ToolRow, map_sqlx_error};

pub struct SqliteToolRepository {
    pool: SqlitePool,
}

impl SqliteToolRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ToolRepository for SqliteToolRepository {
    async fn replace_tools(
        &self,
        server_id: ServerId,
        source: DetectionSource,
        tools: &[Tool],
    ) -> Result<(), RepositoryError> {
        let id = server_id.to_string();
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let updated = sqlx::query("UPDATE servers SET tools_detection_source = ? WHERE id = ?")
            .bind(source.as_str())
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        if updated.rows_affected() == 0 {
            // Dropping the transaction rolls it back.
            return Err(RepositoryError::NotFound(format!("server {server_id}")));
        }

        sqlx::query("DELETE FROM server_tools WHERE server_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        for tool in tools {
            let parameters = tool
                .parameters
                .as_ref()
                .map(serde_json::to_string)
                .transpose()
                .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

            sqlx::query(
                r#"
                INSERT INTO server_tools (id, server_id, name, description, method, endpoint, detection_source, parameters)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(tool.id.to_string())
            .bind(&id)
            .bind(&tool.name)
            .bind(&tool.description)
            .bind(tool.method.as_str())
            .bind(&tool.endpoint)
            .bind(tool.detection_source.as_str())
            .bind(parameters)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn list_for_server(&self, server_id: ServerId) -> Result<Vec<Tool>, RepositoryError> {
        let rows = sqlx::query_as::<_, ToolRow>(
            r#"
            SELECT id, server_id, name, description, method, endpoint, detection_source, parameters
            FROM server_tools WHERE server_id = ? ORDER BY name ASC
            "#,
        )
        .bind(server_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(Tool::try_from).collect()
    }
}
