//! Endpoint health probe.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use mcpdir_core::{HealthEntry, HealthProbe, HealthStatus, Server};
use reqwest::StatusCode;
use tracing::debug;

use crate::config::RemoteConfig;
use crate::error::RemoteResult;

/// Status for a completed request.
///
/// 2xx is online unless slower than `degraded_after`, 503 is maintenance and
/// anything else that answered is degraded.
pub fn classify(status: StatusCode, elapsed: Duration, degraded_after: Duration) -> HealthStatus {
    if status.is_success() {
        if elapsed > degraded_after {
            HealthStatus::Degraded
        } else {
            HealthStatus::Online
        }
    } else if status == StatusCode::SERVICE_UNAVAILABLE {
        HealthStatus::Maintenance
    } else {
        HealthStatus::Degraded
    }
}

/// Single GET against the server's external URL with a hard timeout.
///
/// No retries: a check measures the endpoint as it is right now.
#[derive(Clone)]
pub struct HttpHealthProbe {
    client: reqwest::Client,
    degraded_after: Duration,
}

impl HttpHealthProbe {
    pub fn new(config: &RemoteConfig) -> RemoteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.health_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            degraded_after: config.degraded_after,
        })
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn check(&self, server: &Server) -> Option<HealthEntry> {
        let url = server
            .external_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())?;

        let started = Instant::now();
        let result = self.client.get(url).send().await;
        let elapsed = started.elapsed();

        let (status, response_time_ms) = match result {
            Ok(response) => (
                classify(response.status(), elapsed, self.degraded_after),
                Some(i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)),
            ),
            Err(e) => {
                debug!(server = %server.slug, error = %e, "Health check failed");
                (HealthStatus::Offline, None)
            }
        };

        Some(HealthEntry {
            server_id: server.id,
            status,
            response_time_ms,
            checked_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiers::tests::server_with;

    const THRESHOLD: Duration = Duration::from_secs(2);

    #[test]
    fn test_fast_success_is_online() {
        assert_eq!(
            classify(StatusCode::OK, Duration::from_millis(120), THRESHOLD),
            HealthStatus::Online
        );
        assert_eq!(
            classify(StatusCode::NO_CONTENT, THRESHOLD, THRESHOLD),
            HealthStatus::Online
        );
    }

    #[test]
    fn test_slow_success_is_degraded() {
        assert_eq!(
            classify(StatusCode::OK, Duration::from_millis(2500), THRESHOLD),
            HealthStatus::Degraded
        );
    }

    #[test]
    fn test_error_statuses() {
        let fast = Duration::from_millis(10);
        assert_eq!(
            classify(StatusCode::SERVICE_UNAVAILABLE, fast, THRESHOLD),
            HealthStatus::Maintenance
        );
        assert_eq!(
            classify(StatusCode::NOT_FOUND, fast, THRESHOLD),
            HealthStatus::Degraded
        );
        assert_eq!(
            classify(StatusCode::INTERNAL_SERVER_ERROR, fast, THRESHOLD),
            HealthStatus::Degraded
        );
    }

    #[tokio::test]
    async fn test_no_endpoint_is_not_checked() {
        let probe = HttpHealthProbe::new(&RemoteConfig::new()).unwrap();
        assert!(probe.check(&server_with(None, None)).await.is_none());
        assert!(probe.check(&server_with(Some("  "), None)).await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_offline() {
        let config = RemoteConfig::new().with_health_timeout(Duration::from_millis(500));
        let probe = HttpHealthProbe::new(&config).unwrap();
        // Nothing listens on the local discard port.
        let entry = probe
            .check(&server_with(Some("http://127.0.0.1:9/"), None))
            .await
            .unwrap();
        assert_eq!(entry.status, HealthStatus::Offline);
        assert!(entry.response_time_ms.is_none());
    }
}
