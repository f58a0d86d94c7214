//! `SQLite` implementation of the server repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use mcpdir_core::{
    CatalogQuery, HealthStatus, RepoStats, RepositoryError, SearchPage, Server, ServerId,
    ServerRepository, SortField, SortOrder, UpsertOutcome,
};

use super::row_mappers::{
    SERVER_SELECT_COLUMNS, ServerRow, format_timestamp, map_sqlx_error, rows_to_servers,
};

/// Mirrors `HealthStatus::rank`.
const HEALTH_RANK: &str = "CASE health_status \
    WHEN 'online' THEN 0 \
    WHEN 'degraded' THEN 1 \
    WHEN 'maintenance' THEN 2 \
    WHEN 'unknown' THEN 3 \
    ELSE 4 END";

pub struct SqliteServerRepository {
    pool: SqlitePool,
}

impl SqliteServerRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// `%needle%` with LIKE wildcards escaped by backslash.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &CatalogQuery) {
    builder.push(" WHERE 1 = 1");
    if let Some(category) = query.category {
        builder.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(tag) = &query.tag {
        builder
            .push(" AND EXISTS (SELECT 1 FROM json_each(servers.tags) WHERE lower(json_each.value) = ")
            .push_bind(tag.to_lowercase())
            .push(")");
    }
    if let Some(platform) = &query.platform {
        builder
            .push(" AND lower(platform) = ")
            .push_bind(platform.to_lowercase());
    }
    if let Some(q) = &query.q {
        let pattern = like_pattern(q);
        builder
            .push(" AND (lower(name) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR lower(description) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR EXISTS (SELECT 1 FROM json_each(servers.tags) WHERE lower(json_each.value) LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\'))");
    }
}

fn order_clause(sort: SortField, order: SortOrder) -> String {
    let column = match sort {
        SortField::Name => "lower(name)",
        SortField::Stars => "stars",
        SortField::Forks => "forks",
        SortField::LastUpdated => "last_updated",
        SortField::HealthStatus => HEALTH_RANK,
    };
    let direction = match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    format!(" ORDER BY {column} {direction}, lower(name) ASC, id ASC")
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl ServerRepository for SqliteServerRepository {
    async fn upsert(&self, server: &Server) -> Result<UpsertOutcome, RepositoryError> {
        let id = server.id.to_string();
        let tags = serde_json::to_string(&server.tags)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM servers WHERE id = ?")
            .bind(&id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        // Health, enrichment and detection columns belong to other jobs.
        sqlx::query(
            r#"
            INSERT INTO servers (
                id, slug, name, description, category, tags, platform, install_method,
                install_instructions, github_url, external_url, package_registry, package_name,
                stars, forks, open_issues, contributors, health_status, tools_detection_source,
                last_updated, last_checked
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                slug = excluded.slug,
                name = excluded.name,
                description = excluded.description,
                category = excluded.category,
                tags = excluded.tags,
                platform = excluded.platform,
                install_method = excluded.install_method,
                install_instructions = excluded.install_instructions,
                github_url = excluded.github_url,
                external_url = excluded.external_url,
                package_registry = excluded.package_registry,
                package_name = excluded.package_name,
                stars = excluded.stars,
                last_updated = excluded.last_updated
            "#,
        )
        .bind(&id)
        .bind(&server.slug)
        .bind(&server.name)
        .bind(&server.description)
        .bind(server.category.as_str())
        .bind(&tags)
        .bind(&server.platform)
        .bind(&server.install_method)
        .bind(server.install_instructions.to_stored())
        .bind(&server.github_url)
        .bind(&server.external_url)
        .bind(&server.package_registry)
        .bind(&server.package_name)
        .bind(server.stars)
        .bind(server.forks)
        .bind(server.open_issues)
        .bind(server.contributors)
        .bind(server.health_status.as_str())
        .bind(server.tools_detection_source.map(|s| s.as_str()))
        .bind(format_timestamp(&server.last_updated))
        .bind(server.last_checked.as_ref().map(format_timestamp))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(if existing > 0 {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Inserted
        })
    }

    async fn get(&self, id_or_slug: &str) -> Result<Server, RepositoryError> {
        let sql = format!("SELECT {SERVER_SELECT_COLUMNS} FROM servers WHERE id = ? OR slug = ?");
        let row = sqlx::query_as::<_, ServerRow>(&sql)
            .bind(id_or_slug)
            .bind(id_or_slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| RepositoryError::NotFound(format!("server {id_or_slug}")))?;
        Server::try_from(row)
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM servers")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn list_page(&self, offset: u64, limit: u32) -> Result<Vec<Server>, RepositoryError> {
        let sql = format!(
            "SELECT {SERVER_SELECT_COLUMNS} FROM servers ORDER BY slug ASC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, ServerRow>(&sql)
            .bind(i64::from(limit))
            .bind(to_i64(offset))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows_to_servers(rows)
    }

    async fn search(&self, query: &CatalogQuery) -> Result<SearchPage, RepositoryError> {
        if query.unknown_category {
            return Ok(SearchPage {
                servers: Vec::new(),
                total: 0,
            });
        }

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM servers");
        push_filters(&mut count, query);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let mut select =
            QueryBuilder::<Sqlite>::new(format!("SELECT {SERVER_SELECT_COLUMNS} FROM servers"));
        push_filters(&mut select, query);
        select.push(order_clause(query.sort, query.order));
        select
            .push(" LIMIT ")
            .push_bind(i64::from(query.limit))
            .push(" OFFSET ")
            .push_bind(to_i64(query.offset));
        let rows: Vec<ServerRow> = select
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(SearchPage {
            servers: rows_to_servers(rows)?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn update_health(
        &self,
        id: ServerId,
        status: HealthStatus,
        checked_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE servers SET health_status = ?, last_checked = ? WHERE id = ?")
                .bind(status.as_str())
                .bind(format_timestamp(&checked_at))
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("server {id}")));
        }
        Ok(())
    }

    async fn update_repo_stats(
        &self,
        id: ServerId,
        stats: RepoStats,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE servers SET stars = ?, forks = ?, open_issues = ?, contributors = ? WHERE id = ?",
        )
        .bind(stats.stars)
        .bind(stats.forks)
        .bind(stats.open_issues)
        .bind(stats.contributors)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("server {id}")));
        }
        Ok(())
    }
}
