//! Tools detection over the stored catalog.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::batch::{
    BatchConfig, BatchJob, BatchOutcome, BatchSlice, ItemOutcome, ItemStatus, run_for_each,
};
use crate::detector::{Detection, ToolsDetector};
use crate::domain::{DetectionSource, Server};
use crate::ports::{CoreError, ServerRepository, ToolRepository};

pub struct DetectToolsJob {
    servers: Arc<dyn ServerRepository>,
    tools: Arc<dyn ToolRepository>,
    detector: ToolsDetector,
    only_missing: bool,
}

impl DetectToolsJob {
    pub fn new(
        servers: Arc<dyn ServerRepository>,
        tools: Arc<dyn ToolRepository>,
        detector: ToolsDetector,
    ) -> Self {
        Self {
            servers,
            tools,
            detector,
            only_missing: false,
        }
    }

    /// Skip servers that already have a detection state.
    #[must_use]
    pub const fn only_missing(mut self, only_missing: bool) -> Self {
        self.only_missing = only_missing;
        self
    }
}

async fn detect_one(
    server: Server,
    detector: ToolsDetector,
    tools: Arc<dyn ToolRepository>,
    only_missing: bool,
    dry_run: bool,
) -> ItemOutcome {
    if only_missing {
        if let Some(source) = server.tools_detection_source {
            return ItemOutcome::new(&server, ItemStatus::Skipped)
                .with_detail(format!("already detected ({source})"));
        }
    }

    let detection = detector.detect(&server).await;
    let source = detection.source();
    let summary = match &detection {
        Detection::Detected { tools, .. } => format!("{} tools via {source}", tools.len()),
        Detection::None { attempts } => {
            let reasons: Vec<String> = attempts
                .iter()
                .map(|a| format!("{}: {}", a.source, a.reason))
                .collect();
            format!("no tools detected ({})", reasons.join("; "))
        }
    };
    let status = if detection.is_detected() {
        ItemStatus::Updated
    } else {
        ItemStatus::Failed
    };

    if dry_run {
        return ItemOutcome::new(&server, ItemStatus::Skipped)
            .with_detail(format!("dry run: {summary}"));
    }

    let records = detection.into_tools(server.id);
    if let Err(e) = tools.replace_tools(server.id, source, &records).await {
        warn!(server = %server.slug, error = %e, "Failed to store tools");
        return ItemOutcome::new(&server, ItemStatus::Failed)
            .with_detail(format!("failed to store tools: {e}"));
    }
    if source == DetectionSource::None {
        warn!(server = %server.slug, "No tier detected any tools");
    }

    ItemOutcome::new(&server, status).with_detail(summary)
}

#[async_trait]
impl BatchJob for DetectToolsJob {
    fn name(&self) -> &'static str {
        "detect-tools"
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
        let outcomes = run_for_each(servers, config, |server| {
            detect_one(
                server,
                self.detector.clone(),
                Arc::clone(&self.tools),
                self.only_missing,
                config.dry_run,
            )
        })
        .await;
        Ok(BatchOutcome::from_outcomes(outcomes))
    }
}
