//! Row types and conversions shared by the `SQLite` repositories.

use chrono::{DateTime, SecondsFormat, Utc};
use mcpdir_core::{
    ChangelogEntry, CompatibilityEntry, DetectionSource, HealthEntry, InstallInstructions,
    RepositoryError, Server, ServerId, Tool,
};
use uuid::Uuid;

/// Shared SELECT column list for server queries.
pub const SERVER_SELECT_COLUMNS: &str = "id, slug, name, description, category, tags, platform, install_method, install_instructions, github_url, external_url, package_registry, package_name, stars, forks, open_issues, contributors, health_status, tools_detection_source, last_updated, last_checked";

/// Fixed-width RFC 3339 so text order is time order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Serialization(format!("bad timestamp '{value}': {e}")))
}

fn parse_server_id(value: &str) -> Result<ServerId, RepositoryError> {
    value
        .parse()
        .map_err(|_| RepositoryError::Serialization(format!("bad server id '{value}'")))
}

/// Map `SQLx` errors to the port error.
pub fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::RowNotFound = e {
        return RepositoryError::NotFound(e.to_string());
    }
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
            return RepositoryError::Constraint(db_err.message().to_string());
        }
    }
    RepositoryError::Storage(e.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Servers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(sqlx::FromRow)]
pub struct ServerRow {
    id: String,
    slug: String,
    name: String,
    description: String,
    category: String,
    tags: String,
    platform: String,
    install_method: String,
    install_instructions: Option<String>,
    github_url: Option<String>,
    external_url: Option<String>,
    package_registry: Option<String>,
    package_name: Option<String>,
    stars: i64,
    forks: i64,
    open_issues: i64,
    contributors: i64,
    health_status: String,
    tools_detection_source: Option<String>,
    last_updated: String,
    last_checked: Option<String>,
}

impl TryFrom<ServerRow> for Server {
    type Error = RepositoryError;

    fn try_from(row: ServerRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_server_id(&row.id)?,
            slug: row.slug,
            name: row.name,
            description: row.description,
            // Unknown labels degrade to the defaults rather than hiding the row.
            category: row.category.parse().unwrap_or_default(),
            tags: serde_json::from_str(&row.tags).unwrap_or_default(),
            platform: row.platform,
            install_method: row.install_method,
            install_instructions: InstallInstructions::from_stored(
                row.install_instructions.as_deref(),
            ),
            github_url: row.github_url,
            external_url: row.external_url,
            package_registry: row.package_registry,
            package_name: row.package_name,
            stars: row.stars,
            forks: row.forks,
            open_issues: row.open_issues,
            contributors: row.contributors,
            health_status: row.health_status.parse().unwrap_or_default(),
            tools_detection_source: row
                .tools_detection_source
                .as_deref()
                .and_then(|s| s.parse::<DetectionSource>().ok()),
            last_updated: parse_timestamp(&row.last_updated)?,
            last_checked: row
                .last_checked
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
        })
    }
}

pub fn rows_to_servers(rows: Vec<ServerRow>) -> Result<Vec<Server>, RepositoryError> {
    rows.into_iter().map(Server::try_from).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tools and history
// ─────────────────────────────────────────────────────────────────────────────

#[derive(sqlx::FromRow)]
pub struct ToolRow {
    id: String,
    server_id: String,
    name: String,
    description: String,
    method: String,
    endpoint: String,
    detection_source: String,
    parameters: Option<String>,
}

impl TryFrom<ToolRow> for Tool {
    type Error = RepositoryError;

    fn try_from(row: ToolRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| RepositoryError::Serialization(format!("bad tool id: {e}")))?;
        let parameters = row
            .parameters
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| RepositoryError::Serialization(format!("bad tool parameters: {e}")))?;
        Ok(Self {
            id,
            server_id: parse_server_id(&row.server_id)?,
            name: row.name,
            description: row.description,
            method: row.method.parse().unwrap_or_default(),
            endpoint: row.endpoint,
            detection_source: row
                .detection_source
                .parse()
                .unwrap_or(DetectionSource::None),
            parameters,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct HealthRow {
    server_id: String,
    status: String,
    response_time_ms: Option<i64>,
    checked_at: String,
}

impl TryFrom<HealthRow> for HealthEntry {
    type Error = RepositoryError;

    fn try_from(row: HealthRow) -> Result<Self, Self::Error> {
        Ok(Self {
            server_id: parse_server_id(&row.server_id)?,
            status: row.status.parse().unwrap_or_default(),
            response_time_ms: row.response_time_ms,
            checked_at: parse_timestamp(&row.checked_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct ChangelogRow {
    server_id: String,
    version: String,
    title: String,
    body: String,
    released_at: String,
}

impl TryFrom<ChangelogRow> for ChangelogEntry {
    type Error = RepositoryError;

    fn try_from(row: ChangelogRow) -> Result<Self, Self::Error> {
        Ok(Self {
            server_id: parse_server_id(&row.server_id)?,
            version: row.version,
            title: row.title,
            body: row.body,
            released_at: parse_timestamp(&row.released_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct CompatibilityRow {
    server_id: String,
    client: String,
    platform: String,
    status: String,
    notes: Option<String>,
}

impl TryFrom<CompatibilityRow> for CompatibilityEntry {
    type Error = RepositoryError;

    fn try_from(row: CompatibilityRow) -> Result<Self, Self::Error> {
        Ok(Self {
            server_id: parse_server_id(&row.server_id)?,
            client: row.client,
            platform: row.platform,
            status: row.status,
            notes: row.notes,
        })
    }
}
