//! HTTP query surface for the MCP directory.
//!
//! Read-only handlers over a [`mcpdir_core::CatalogReader`]. When no store
//! is configured, or the store fails on a request, answers come from a
//! static mock catalog and are flagged with `isMockData: true`.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod mock;
pub mod routes;
pub mod state;

// Re-export primary types
pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use routes::create_router;
pub use state::AppState;
