//! Tiered tools detector.
//!
//! Tiers run in a fixed priority order: standard MCP API, alternative API,
//! GitHub repository. The first tier that yields at least one tool wins and
//! the remaining tiers are never invoked. A tier that errors or comes back
//! empty is logged and skipped; only total exhaustion is reported.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{DetectionSource, DiscoveredTool, Server, ServerId, Tool};
use crate::ports::{TierError, ToolTier};

/// Why a single tier did not produce tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierAttempt {
    pub source: DetectionSource,
    pub reason: String,
}

/// Result of running the detector for one server.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// A tier produced tools.
    Detected {
        source: DetectionSource,
        tools: Vec<DiscoveredTool>,
    },
    /// Every tier was exhausted.
    None { attempts: Vec<TierAttempt> },
}

impl Detection {
    /// Source tag to persist; `DetectionSource::None` on exhaustion.
    pub const fn source(&self) -> DetectionSource {
        match self {
            Self::Detected { source, .. } => *source,
            Self::None { .. } => DetectionSource::None,
        }
    }

    pub const fn is_detected(&self) -> bool {
        matches!(self, Self::Detected { .. })
    }

    /// Bind tools to the server. Duplicate names keep the first occurrence.
    pub fn into_tools(self, server_id: ServerId) -> Vec<Tool> {
        match self {
            Self::Detected { source, tools } => {
                let mut seen = HashSet::new();
                tools
                    .into_iter()
                    .filter(|t| seen.insert(t.name.clone()))
                    .map(|t| Tool::from_discovered(server_id, source, t))
                    .collect()
            }
            Self::None { .. } => Vec::new(),
        }
    }
}

/// Runs detection tiers in priority order.
#[derive(Clone)]
pub struct ToolsDetector {
    tiers: Vec<Arc<dyn ToolTier>>,
}

impl ToolsDetector {
    /// Fix the tier order: standard, alternative, GitHub.
    pub fn new(
        standard: Arc<dyn ToolTier>,
        alternative: Arc<dyn ToolTier>,
        github: Arc<dyn ToolTier>,
    ) -> Self {
        Self {
            tiers: vec![standard, alternative, github],
        }
    }

    pub async fn detect(&self, server: &Server) -> Detection {
        let mut attempts = Vec::with_capacity(self.tiers.len());

        for tier in &self.tiers {
            let source = tier.source();
            match tier.discover(server).await {
                Ok(tools) if !tools.is_empty() => {
                    info!(
                        server = %server.slug,
                        source = %source,
                        count = tools.len(),
                        "Detected tools"
                    );
                    return Detection::Detected { source, tools };
                }
                Ok(_) => {
                    debug!(server = %server.slug, source = %source, "Tier returned no tools");
                    attempts.push(TierAttempt {
                        source,
                        reason: TierError::Empty.to_string(),
                    });
                }
                Err(TierError::NotApplicable(reason)) => {
                    debug!(server = %server.slug, source = %source, %reason, "Tier not applicable");
                    attempts.push(TierAttempt { source, reason });
                }
                Err(e) => {
                    warn!(server = %server.slug, source = %source, error = %e, "Tier failed");
                    attempts.push(TierAttempt {
                        source,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Detection::None { attempts }
    }
}
