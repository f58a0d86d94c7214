//! Server records and the enumerations attached to them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::history::{ChangelogEntry, CompatibilityEntry};
use super::install::InstallInstructions;
use super::tool::Tool;
use super::HealthEntry;

/// Namespace for deterministic server ids.
///
/// Changing this value re-keys every catalog row, so it must stay fixed.
const SERVER_NAMESPACE: Uuid = Uuid::from_u128(0x6d63_7064_6972_4f00_8a5e_5e12_7665_7273);

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Deterministic server identifier (UUID v5 over the slug).
///
/// Two sync runs that see the same slug always produce the same id, which is
/// what makes repeated syncs idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(Uuid);

impl ServerId {
    /// Derive the id for a slug.
    pub fn from_slug(slug: &str) -> Self {
        Self(Uuid::new_v5(&SERVER_NAMESPACE, slug.as_bytes()))
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ServerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Enumerations
// ─────────────────────────────────────────────────────────────────────────────

/// Error returned when a stored enum label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Generates `as_str`, `Display` and `FromStr` for a string-labelled enum.
macro_rules! labelled_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $ty {
            /// Stable label used in storage and JSON.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Single category label assigned by keyword matching during sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Auth,
    Database,
    Ai,
    Files,
    Web,
    #[default]
    Other,
}

labelled_enum!(Category, "category", {
    Auth => "auth",
    Database => "database",
    Ai => "ai",
    Files => "files",
    Web => "web",
    Other => "other",
});

/// Last known health of a server endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Online,
    Offline,
    Degraded,
    #[default]
    Unknown,
    Maintenance,
}

labelled_enum!(HealthStatus, "health status", {
    Online => "online",
    Offline => "offline",
    Degraded => "degraded",
    Unknown => "unknown",
    Maintenance => "maintenance",
});

impl HealthStatus {
    /// Ordering rank used when sorting by health (healthiest first).
    pub const fn rank(self) -> u8 {
        match self {
            Self::Online => 0,
            Self::Degraded => 1,
            Self::Maintenance => 2,
            Self::Unknown => 3,
            Self::Offline => 4,
        }
    }
}

/// Which detection tier produced a server's tool list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    StandardMcpApi,
    AlternativeApi,
    GithubRepository,
    /// Every tier was tried and none produced a tool.
    None,
}

labelled_enum!(DetectionSource, "detection source", {
    StandardMcpApi => "standard_mcp_api",
    AlternativeApi => "alternative_api",
    GithubRepository => "github_repository",
    None => "none",
});

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

/// A cataloged MCP server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: ServerId,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    /// Free-text tokens, at most ten.
    pub tags: Vec<String>,
    /// Runtime the server targets (`node`, `python`, `rust`, `go`, `any`).
    pub platform: String,
    /// How the server is installed (`npm`, `pip`, `cargo`, `go`, `manual`).
    pub install_method: String,
    pub install_instructions: InstallInstructions,
    pub github_url: Option<String>,
    pub external_url: Option<String>,
    pub package_registry: Option<String>,
    pub package_name: Option<String>,
    pub stars: i64,
    pub forks: i64,
    pub open_issues: i64,
    pub contributors: i64,
    pub health_status: HealthStatus,
    /// `None` until the tools detector has run for this server.
    pub tools_detection_source: Option<DetectionSource>,
    pub last_updated: DateTime<Utc>,
    pub last_checked: Option<DateTime<Utc>>,
}

/// Repository statistics refreshed by the enrichment job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoStats {
    pub stars: i64,
    pub forks: i64,
    pub open_issues: i64,
    pub contributors: i64,
}

/// A server with everything the detail view shows.
#[derive(Debug, Clone, Serialize)]
pub struct ServerDetail {
    pub server: Server,
    pub tools: Vec<Tool>,
    /// Most recent checks, newest first.
    pub health: Vec<HealthEntry>,
    pub changelog: Vec<ChangelogEntry>,
    pub compatibility: Vec<CompatibilityEntry>,
}
