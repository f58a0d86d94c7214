//! Endpoint health checks.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::batch::{
    BatchConfig, BatchJob, BatchOutcome, BatchSlice, ItemOutcome, ItemStatus, run_for_each,
};
use crate::domain::Server;
use crate::ports::{CoreError, HealthProbe, HealthRepository, ServerRepository};

pub struct HealthCheckJob {
    servers: Arc<dyn ServerRepository>,
    history: Arc<dyn HealthRepository>,
    probe: Arc<dyn HealthProbe>,
}

impl HealthCheckJob {
    pub fn new(
        servers: Arc<dyn ServerRepository>,
        history: Arc<dyn HealthRepository>,
        probe: Arc<dyn HealthProbe>,
    ) -> Self {
        Self {
            servers,
            history,
            probe,
        }
    }

    async fn check_one(&self, server: Server, dry_run: bool) -> ItemOutcome {
        let Some(entry) = self.probe.check(&server).await else {
            return ItemOutcome::new(&server, ItemStatus::Skipped).with_detail("no endpoint");
        };
        let detail = match entry.response_time_ms {
            Some(ms) => format!("{} in {ms}ms", entry.status),
            None => entry.status.to_string(),
        };
        if dry_run {
            return ItemOutcome::new(&server, ItemStatus::Skipped)
                .with_detail(format!("dry run: {detail}"));
        }

        let stored = async {
            self.history.record(&entry).await?;
            self.servers
                .update_health(server.id, entry.status, entry.checked_at)
                .await
        };
        match stored.await {
            Ok(()) => ItemOutcome::new(&server, ItemStatus::Updated).with_detail(detail),
            Err(e) => {
                warn!(server = %server.slug, error = %e, "Failed to store health check");
                ItemOutcome::new(&server, ItemStatus::Failed)
                    .with_detail(format!("failed to store health: {e}"))
            }
        }
    }
}

#[async_trait]
impl BatchJob for HealthCheckJob {
    fn name(&self) -> &'static str {
        "health-check"
    }

    async fn total(&self) -> Result<u64, CoreError> {
        Ok(self.servers.count().await?)
    }

    async fn run_batch(
        &self,
        slice: &BatchSlice,
        config: &BatchConfig,
    ) -> Result<BatchOutcome, CoreError> {
        let servers = self.servers.list_page(slice.offset, slice.size).await?;
        let outcomes =
            run_for_each(servers, config, |server| self.check_one(server, config.dry_run)).await;
        Ok(BatchOutcome::from_outcomes(outcomes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HealthEntry, HealthStatus};
    use crate::testing::{MemoryStore, fixed_time, sample_server};

    struct StaticProbe;

    #[async_trait]
    impl HealthProbe for StaticProbe {
        async fn check(&self, server: &Server) -> Option<HealthEntry> {
            server.external_url.as_ref()?;
            Some(HealthEntry {
                server_id: server.id,
                status: HealthStatus::Degraded,
                response_time_ms: Some(2400),
                checked_at: fixed_time(),
            })
        }
    }

    #[tokio::test]
    async fn test_records_health_and_skips_servers_without_endpoint() {
        let mut live = sample_server("live");
        live.external_url = Some("https://live.example".into());
        let store = Arc::new(MemoryStore::with_servers([live, sample_server("offline-only")]));
        let job = HealthCheckJob::new(store.clone(), store.clone(), Arc::new(StaticProbe));
        let slice = BatchSlice {
            index: 0,
            offset: 0,
            size: 10,
        };

        let outcome = job.run_batch(&slice, &BatchConfig::default()).await.unwrap();
        assert_eq!(outcome.stats.updated, 1);
        assert_eq!(outcome.stats.skipped, 1);

        let live = store.server("live");
        assert_eq!(live.health_status, HealthStatus::Degraded);
        assert_eq!(live.last_checked, Some(fixed_time()));
        let history = store.recent(live.id, 5).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].response_time_ms, Some(2400));
    }
}
