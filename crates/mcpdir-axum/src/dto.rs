//! Response bodies.
//!
//! Field names are camelCase on the wire.

use mcpdir_core::{CatalogQuery, SearchPage, Server, ServerDetail, ServerId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub offset: u64,
    pub limit: u32,
    pub has_more: bool,
}

impl Pagination {
    pub fn for_page(page: &SearchPage, query: &CatalogQuery) -> Self {
        Self {
            total: page.total,
            offset: query.offset,
            limit: query.limit,
            has_more: page.has_more(query),
        }
    }

    /// Reported alongside a rejected query.
    pub const fn empty() -> Self {
        Self {
            total: 0,
            offset: 0,
            limit: 0,
            has_more: false,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub servers: Vec<Server>,
    pub pagination: Pagination,
    pub is_mock_data: bool,
}

impl SearchResponse {
    pub fn page(page: SearchPage, query: &CatalogQuery, is_mock_data: bool) -> Self {
        let pagination = Pagination::for_page(&page, query);
        Self {
            error: None,
            servers: page.servers,
            pagination,
            is_mock_data,
        }
    }

    pub const fn rejected(error: String, is_mock_data: bool) -> Self {
        Self {
            error: Some(error),
            servers: Vec::new(),
            pagination: Pagination::empty(),
            is_mock_data,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailResponse {
    #[serde(flatten)]
    pub detail: ServerDetail,
    pub is_mock_data: bool,
}

/// One sub-resource of a server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub server_id: ServerId,
    pub items: Vec<T>,
    pub is_mock_data: bool,
}
