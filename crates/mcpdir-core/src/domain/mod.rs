//! Domain types for the MCP directory.
//!
//! These types describe catalog records independently of where they are
//! stored (SQLite, the in-memory mock set) or where they came from
//! (PulseMCP, GitHub).
//!
//! # Structure
//!
//! - `server` - Server records, identifiers and enumerations
//! - `install` - Install instructions decoded at the store boundary
//! - `tool` - Tool records produced by the tools detector
//! - `health` - Health check entries
//! - `history` - Changelog and compatibility entries

pub mod health;
pub mod history;
pub mod install;
pub mod server;
pub mod tool;

pub use health::{HealthEntry, RECENT_HEALTH_LIMIT};
pub use history::{ChangelogEntry, CompatibilityEntry};
pub use install::{InstallInstructions, InstallStep};
pub use server::{
    Category, DetectionSource, HealthStatus, ParseEnumError, RepoStats, Server, ServerDetail,
    ServerId,
};
pub use tool::{DiscoveredTool, HttpMethod, Tool};
