//! Types shared by the catalog query engine.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Default upper bound on the page count reported to callers.
pub const DEFAULT_PAGE_CAP: u32 = 50;

/// Identifier of a catalog item.
///
/// Sources disagree on the id type (RAWG uses integers, some static lists use
/// slugs), so both are accepted and serialized untagged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(id) => write!(f, "{}", id),
            ItemId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId::Int(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::Str(id.to_string())
    }
}

/// A browsable entity (a game or a car) in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique identifier within a result set.
    pub id: ItemId,
    /// Display name (never empty).
    pub name: String,
    /// Cover/background image. Consumers substitute a placeholder when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Rating in [0.0, 5.0].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Release date. Absent means unreleased or unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<NaiveDate>,
    /// Genre names in source relevance order.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Platform names in source order.
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Lowercase classification tag (static catalogs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Secondary search field supplied by the adapter (car brand, game developer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Monotonic insertion index, larger is newer. Local catalogs assign list
    /// position; remote records carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_order: Option<u64>,
    /// Gameplay clip URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_url: Option<String>,
    /// Number of wallpapers available for this item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallpaper_count: Option<u32>,
    /// Long description, only present on detail lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CatalogItem {
    /// Create an item with only the required fields set.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_url: None,
            rating: None,
            released: None,
            genres: Vec::new(),
            platforms: Vec::new(),
            category: None,
            brand: None,
            added_order: None,
            clip_url: None,
            wallpaper_count: None,
            description: None,
        }
    }

    /// Rating used for ordering; absent ratings rank as 0.0.
    pub fn sort_rating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

/// Requested ordering of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Highest rated first.
    RatingDesc,
    /// Newest release first; undated items last.
    ReleaseDesc,
    /// A to Z, case-insensitive.
    NameAsc,
    /// Most recently added to the source first.
    RecentlyAdded,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::RatingDesc,
        SortKey::ReleaseDesc,
        SortKey::NameAsc,
        SortKey::RecentlyAdded,
    ];

    /// Parse a sort key from user input.
    ///
    /// Accepts the snake_case names, RAWG `ordering` values (`-rating`,
    /// `-released`, `name`, `-added`) and the UI labels ("highest rated",
    /// "newest", "a to z", "recently added"). RAWG orderings in the opposite
    /// direction (`rating`, `-name`, ...) have no key and yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        match value.as_str() {
            "-rating" => return Some(SortKey::RatingDesc),
            "-released" => return Some(SortKey::ReleaseDesc),
            "name" => return Some(SortKey::NameAsc),
            "-added" => return Some(SortKey::RecentlyAdded),
            _ => {}
        }

        match value.replace('_', " ").as_str() {
            "rating desc" | "highest rated" | "top rated" => Some(SortKey::RatingDesc),
            "release desc" | "newest" => Some(SortKey::ReleaseDesc),
            "name asc" | "a to z" | "alphabetical" => Some(SortKey::NameAsc),
            "recently added" => Some(SortKey::RecentlyAdded),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::RatingDesc => "rating_desc",
            SortKey::ReleaseDesc => "release_desc",
            SortKey::NameAsc => "name_asc",
            SortKey::RecentlyAdded => "recently_added",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive release date range, written `YYYY-MM-DD,YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReleaseWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Parse `YYYY-MM-DD,YYYY-MM-DD`. Returns `None` if either date is
    /// invalid or the range is reversed.
    pub fn parse(value: &str) -> Option<Self> {
        let (from, to) = value.split_once(',')?;
        let from = NaiveDate::parse_from_str(from.trim(), "%Y-%m-%d").ok()?;
        let to = NaiveDate::parse_from_str(to.trim(), "%Y-%m-%d").ok()?;
        (from <= to).then_some(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

impl fmt::Display for ReleaseWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}",
            self.from.format("%Y-%m-%d"),
            self.to.format("%Y-%m-%d")
        )
    }
}

/// A caller's filter, sort and page request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Case-insensitive substring searched in name and brand. Empty disables it.
    #[serde(default)]
    pub search: String,
    /// Exact category tag (case-insensitive). `"All"` or empty disables it.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    /// Only items released inside this window (inclusive).
    #[serde(default)]
    pub released_between: Option<ReleaseWindow>,
    /// `None` keeps source order.
    #[serde(default)]
    pub sort: Option<SortKey>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            genre: None,
            platform: None,
            released_between: None,
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_release_window(mut self, window: ReleaseWindow) -> Self {
        self.released_between = Some(window);
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// The category filter if it is active (not empty and not "All").
    pub fn active_category(&self) -> Option<&str> {
        active(self.category.as_deref()).filter(|c| !c.eq_ignore_ascii_case("all"))
    }

    /// The genre filter if it is non-empty.
    pub fn active_genre(&self) -> Option<&str> {
        active(self.genre.as_deref())
    }

    /// The platform filter if it is non-empty.
    pub fn active_platform(&self) -> Option<&str> {
        active(self.platform.as_deref())
    }

    /// The search term if it is non-empty.
    pub fn active_search(&self) -> Option<&str> {
        active(Some(self.search.as_str()))
    }
}

fn active(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub items: Vec<CatalogItem>,
    pub page: u32,
    pub page_size: u32,
    /// Exact number of matching items, never capped.
    pub total_count: u64,
    /// Page count reported to the caller, at most `page_cap`.
    pub total_pages: u32,
    /// The configured page cap.
    pub page_cap: u32,
    /// True when the true page count exceeded `page_cap`.
    pub capped: bool,
}

/// Errors produced by the query engine and its components.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A raw record lacks a required field.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// An out-of-contract query parameter.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Page number below 1.
    #[error("Invalid page: {0} (pages start at 1)")]
    InvalidPage(u32),

    /// The requested ordering cannot be satisfied by the data source.
    #[error("Sort key '{key}' is not supported by {source_name}")]
    UnsupportedSortKey { key: SortKey, source_name: String },

    /// The remote adapter did not answer in time. Carries the caller's
    /// deadline when there was one; otherwise the adapter's own client
    /// timeout fired.
    #[error("Upstream request timed out{}", timeout_suffix(.0))]
    UpstreamTimeout(Option<std::time::Duration>),

    /// The remote adapter failed.
    #[error("Upstream failure ({kind}): {message}")]
    UpstreamFailure { kind: String, message: String },

    /// The caller withdrew the request.
    #[error("Request cancelled")]
    Cancelled,
}

fn timeout_suffix(limit: &Option<std::time::Duration>) -> String {
    limit
        .map(|d| format!(" after {:?}", d))
        .unwrap_or_default()
}

impl CatalogError {
    /// Stable machine-readable kind, used in API bodies and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::MalformedRecord(_) => "malformed_record",
            CatalogError::InvalidQuery(_) => "invalid_query",
            CatalogError::InvalidPage(_) => "invalid_page",
            CatalogError::UnsupportedSortKey { .. } => "unsupported_sort_key",
            CatalogError::UpstreamTimeout(_) => "upstream_timeout",
            CatalogError::UpstreamFailure { .. } => "upstream_failure",
            CatalogError::Cancelled => "cancelled",
        }
    }

    /// Whether the error is the caller's fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CatalogError::InvalidQuery(_)
                | CatalogError::InvalidPage(_)
                | CatalogError::UnsupportedSortKey { .. }
        )
    }

    /// Whether the error came from the upstream catalog.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            CatalogError::UpstreamTimeout(_) | CatalogError::UpstreamFailure { .. }
        )
    }

    /// Whether the upstream reported that the requested item does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::UpstreamFailure { kind, .. } if kind == "not_found")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_deadline_only_when_set() {
        let with = CatalogError::UpstreamTimeout(Some(std::time::Duration::from_secs(10)));
        assert_eq!(with.to_string(), "Upstream request timed out after 10s");

        let without = CatalogError::UpstreamTimeout(None);
        assert_eq!(without.to_string(), "Upstream request timed out");
    }

    #[test]
    fn test_sort_key_parse_accepts_rawg_orderings() {
        assert_eq!(SortKey::parse("-rating"), Some(SortKey::RatingDesc));
        assert_eq!(SortKey::parse("-released"), Some(SortKey::ReleaseDesc));
        assert_eq!(SortKey::parse("name"), Some(SortKey::NameAsc));
        assert_eq!(SortKey::parse("-added"), Some(SortKey::RecentlyAdded));
    }

    #[test]
    fn test_sort_key_parse_rejects_reversed_orderings() {
        for value in ["-name", "rating", "released", "added", "-rating_desc", "name desc"] {
            assert_eq!(SortKey::parse(value), None, "{}", value);
        }
    }

    #[test]
    fn test_sort_key_parse_accepts_labels_and_names() {
        assert_eq!(SortKey::parse("Highest Rated"), Some(SortKey::RatingDesc));
        assert_eq!(SortKey::parse("highest rated"), Some(SortKey::RatingDesc));
        assert_eq!(SortKey::parse("A to Z"), Some(SortKey::NameAsc));
        assert_eq!(SortKey::parse("Recently Added"), Some(SortKey::RecentlyAdded));
        assert_eq!(SortKey::parse("release_desc"), Some(SortKey::ReleaseDesc));
        assert_eq!(SortKey::parse("-metacritic"), None);
    }

    #[test]
    fn test_sort_key_round_trips_through_as_str() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn test_item_id_serializes_untagged() {
        assert_eq!(serde_json::to_string(&ItemId::Int(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&ItemId::Str("bmw".into())).unwrap(),
            "\"bmw\""
        );
        let id: ItemId = serde_json::from_str("42").unwrap();
        assert_eq!(id, ItemId::Int(42));
    }

    #[test]
    fn test_query_active_filters() {
        let query = Query::new()
            .with_category("All")
            .with_genre("  ")
            .with_platform("PC")
            .with_search("");
        assert_eq!(query.active_category(), None);
        assert_eq!(query.active_genre(), None);
        assert_eq!(query.active_platform(), Some("PC"));
        assert_eq!(query.active_search(), None);

        let query = Query::new().with_category("Hypercar");
        assert_eq!(query.active_category(), Some("Hypercar"));
    }

    #[test]
    fn test_release_window_parse() {
        let window = ReleaseWindow::parse("2023-01-01,2024-12-31").unwrap();
        assert_eq!(window.to_string(), "2023-01-01,2024-12-31");
        assert!(window.contains(NaiveDate::from_ymd_opt(2023, 8, 3).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2020, 12, 10).unwrap()));

        assert!(ReleaseWindow::parse("2024-12-31,2023-01-01").is_none());
        assert!(ReleaseWindow::parse("2023-01-01").is_none());
        assert!(ReleaseWindow::parse("soon,later").is_none());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(CatalogError::InvalidPage(0).kind(), "invalid_page");
        assert!(CatalogError::InvalidPage(0).is_client_error());
        assert!(CatalogError::Cancelled.kind() == "cancelled");
        let upstream = CatalogError::UpstreamFailure {
            kind: "server".into(),
            message: "boom".into(),
        };
        assert!(upstream.is_upstream());
        assert!(!upstream.is_client_error());
    }
}
