//! Changelog and compatibility rows. Both are append-only per server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::server::ServerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub server_id: ServerId,
    pub version: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub released_at: DateTime<Utc>,
}

/// Whether a server works with a given MCP client on a given platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityEntry {
    pub server_id: ServerId,
    /// Client application, e.g. `claude-desktop`.
    pub client: String,
    pub platform: String,
    /// `compatible`, `partial` or `incompatible`.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
