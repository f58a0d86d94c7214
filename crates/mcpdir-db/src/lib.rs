//! SQLite catalog store.
//!
//! Schema setup, repository implementations of the core ports and the
//! read-side catalog used by the HTTP handlers. The `SqlitePool` never
//! leaves this crate through a port signature.

#![deny(unsafe_code)]

pub mod factory;
pub mod repositories;
pub mod setup;

// Re-export factory for convenient access
pub use factory::CatalogFactory;

// Re-export repository implementations
pub use repositories::{
    SqliteCatalogReader, SqliteChangelogRepository, SqliteCompatibilityRepository,
    SqliteHealthRepository, SqliteServerRepository, SqliteToolRepository,
};

// Re-export setup functions for convenient access
pub use setup::setup_database;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
