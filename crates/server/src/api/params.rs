//! Browse query parameters and response bodies.

use serde::{Deserialize, Serialize};

use playaxis_core::{CatalogItem, PageResult, Query, SortKey};

use super::error::ApiError;

/// Query-string parameters accepted by the browse endpoints.
///
/// Values stay strings so malformed input becomes a structured
/// `invalid_query` error instead of a bare extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct BrowseParams {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default, alias = "pageSize")]
    pub page_size: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "genres")]
    pub genre: Option<String>,
    #[serde(default, alias = "platforms")]
    pub platform: Option<String>,
    #[serde(default, alias = "ordering")]
    pub sort: Option<String>,
}

impl BrowseParams {
    /// Build a [`Query`], falling back to `default_page_size` and
    /// `default_sort` when the request leaves them out.
    pub fn into_query(
        self,
        default_page_size: u32,
        default_sort: Option<SortKey>,
    ) -> Result<Query, ApiError> {
        let mut query = Query::new()
            .with_page(parse_number("page", self.page.as_deref())?.unwrap_or(1))
            .with_page_size(
                parse_number("page_size", self.page_size.as_deref())?
                    .unwrap_or(default_page_size),
            );

        query.search = self.search.unwrap_or_default();
        query.category = self.category;
        query.genre = self.genre;
        query.platform = self.platform;
        query.sort = match present(self.sort.as_deref()) {
            None => default_sort,
            Some(value) => Some(SortKey::parse(value).ok_or_else(|| {
                ApiError::invalid_query(format!(
                    "unknown sort '{}', expected one of -rating, -released, name, -added",
                    value
                ))
            })?),
        };

        Ok(query)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(name: &str, value: Option<&str>) -> Result<Option<u32>, ApiError> {
    present(value)
        .map(|v| {
            v.parse::<u32>().map_err(|_| {
                ApiError::invalid_query(format!(
                    "{} must be a non-negative integer, got '{}'",
                    name, v
                ))
            })
        })
        .transpose()
}

/// Pagination fields shared by list responses.
#[derive(Debug, Serialize)]
pub struct PageSummary {
    pub success: bool,
    /// Exact number of matching items.
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub page_cap: u32,
    pub capped: bool,
}

impl From<&PageResult> for PageSummary {
    fn from(page: &PageResult) -> Self {
        Self {
            success: true,
            count: page.total_count,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
            page_cap: page.page_cap,
            capped: page.capped,
        }
    }
}

/// A page of games.
#[derive(Debug, Serialize)]
pub struct GamesResponse {
    #[serde(flatten)]
    pub summary: PageSummary,
    pub games: Vec<CatalogItem>,
    /// Set when the games come from bundled data instead of the upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl GamesResponse {
    pub fn live(page: PageResult) -> Self {
        Self {
            summary: PageSummary::from(&page),
            games: page.items,
            degraded: None,
            note: None,
        }
    }

    pub fn fallback(page: PageResult, degraded: bool, note: &str) -> Self {
        Self {
            summary: PageSummary::from(&page),
            games: page.items,
            degraded: degraded.then_some(true),
            note: Some(note.to_string()),
        }
    }
}

/// A page of cars.
#[derive(Debug, Serialize)]
pub struct CarsResponse {
    #[serde(flatten)]
    pub summary: PageSummary,
    pub items: Vec<CatalogItem>,
}

impl From<PageResult> for CarsResponse {
    fn from(page: PageResult) -> Self {
        Self {
            summary: PageSummary::from(&page),
            items: page.items,
        }
    }
}
