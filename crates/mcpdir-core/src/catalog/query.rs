//! Search parameters and their validation.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::Category;

pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

/// Raw query-string parameters, exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub platform: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogQueryError {
    #[error("limit must be between 1 and {MAX_LIMIT}, got {0}")]
    LimitOutOfRange(i64),

    #[error("offset must be zero or greater, got {0}")]
    NegativeOffset(i64),

    #[error("{field} must be an integer, got '{value}'")]
    NotANumber { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Name,
    #[default]
    Stars,
    Forks,
    LastUpdated,
    HealthStatus,
}

impl SortField {
    /// Unknown keys sort by stars.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Self::Name,
            "forks" => Self::Forks,
            "last_updated" | "updated" | "lastupdated" => Self::LastUpdated,
            "health_status" | "health" => Self::HealthStatus,
            _ => Self::Stars,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// A validated catalog search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Case-insensitive text matched against name, description and tags.
    pub q: Option<String>,
    pub category: Option<Category>,
    /// A category that is not one of ours; matches nothing.
    pub unknown_category: bool,
    pub tag: Option<String>,
    pub platform: Option<String>,
    pub limit: u32,
    pub offset: u64,
    pub sort: SortField,
    pub order: SortOrder,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            q: None,
            category: None,
            unknown_category: false,
            tag: None,
            platform: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

fn clean(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

fn parse_int(field: &'static str, value: Option<&String>) -> Result<Option<i64>, CatalogQueryError> {
    let Some(raw) = value.map(|v| v.trim()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| CatalogQueryError::NotANumber {
            field,
            value: raw.to_string(),
        })
}

impl CatalogQuery {
    /// Validate raw parameters.
    ///
    /// `limit` defaults to 20 and must lie in `[1, 100]`; `offset` defaults
    /// to 0 and must not be negative.
    pub fn from_params(params: &SearchParams) -> Result<Self, CatalogQueryError> {
        let limit = parse_int("limit", params.limit.as_ref())?.unwrap_or(i64::from(DEFAULT_LIMIT));
        if !(1..=i64::from(MAX_LIMIT)).contains(&limit) {
            return Err(CatalogQueryError::LimitOutOfRange(limit));
        }
        let limit = u32::try_from(limit).unwrap_or(DEFAULT_LIMIT);
        let offset = parse_int("offset", params.offset.as_ref())?.unwrap_or(0);
        let offset = u64::try_from(offset).map_err(|_| CatalogQueryError::NegativeOffset(offset))?;

        let category_label = clean(params.category.as_ref()).map(|c| c.to_lowercase());
        let category = category_label.as_deref().and_then(|c| c.parse::<Category>().ok());
        let unknown_category = category_label.is_some() && category.is_none();

        let order = match clean(params.order.as_ref()).map(|o| o.to_ascii_lowercase()).as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };

        Ok(Self {
            q: clean(params.q.as_ref()),
            category,
            unknown_category,
            tag: clean(params.tag.as_ref()).map(|t| t.to_lowercase()),
            platform: clean(params.platform.as_ref()).map(|p| p.to_lowercase()),
            limit,
            offset,
            sort: clean(params.sort.as_ref())
                .map(|s| SortField::parse_lenient(&s))
                .unwrap_or_default(),
            order,
        })
    }
}
