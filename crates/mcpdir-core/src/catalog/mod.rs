//! Catalog query model shared by the SQLite store and the mock catalog.

pub mod memory;
pub mod query;

use serde::Serialize;

use crate::domain::Server;

pub use memory::InMemoryCatalog;
pub use query::{
    CatalogQuery, CatalogQueryError, DEFAULT_LIMIT, MAX_LIMIT, SearchParams, SortField, SortOrder,
};

/// One page of search results plus the unpaginated match count.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchPage {
    pub servers: Vec<Server>,
    pub total: u64,
}

impl SearchPage {
    /// Whether rows remain after this page.
    pub fn has_more(&self, query: &CatalogQuery) -> bool {
        query.offset + (self.servers.len() as u64) < self.total
    }
}
