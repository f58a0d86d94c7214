//! Batch jobs over the catalog.
//!
//! - `sync` - Pull PulseMCP pages, normalize and upsert
//! - `detect` - Run the tiered tools detector
//! - `health` - Probe server endpoints
//! - `enrich` - Refresh GitHub repository statistics

pub mod detect;
pub mod enrich;
pub mod health;
pub mod sync;

pub use detect::DetectToolsJob;
pub use enrich::EnrichJob;
pub use health::HealthCheckJob;
pub use sync::SyncJob;
