//! Health check entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::server::{HealthStatus, ServerId};

/// Number of health entries shown alongside a server.
pub const RECENT_HEALTH_LIMIT: u32 = 5;

/// Outcome of one health check. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthEntry {
    pub server_id: ServerId,
    pub status: HealthStatus,
    /// `None` when the request never completed.
    pub response_time_ms: Option<i64>,
    pub checked_at: DateTime<Utc>,
}
