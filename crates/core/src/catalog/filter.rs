//! Filter evaluation over normalized items.
//!
//! All active predicates must hold. Input order is preserved, so filtering is
//! idempotent and can be composed with any ordering afterwards.

use super::types::{CatalogItem, Query, ReleaseWindow};

/// Keep the items that satisfy every active filter in `query`.
pub fn filter(items: &[CatalogItem], query: &Query) -> Vec<CatalogItem> {
    let predicate = FilterPredicate::from_query(query);
    items
        .iter()
        .filter(|item| predicate.matches(item))
        .cloned()
        .collect()
}

/// Pre-lowercased form of the active filters of a query.
#[derive(Debug, Default)]
struct FilterPredicate {
    search: Option<String>,
    category: Option<String>,
    genre: Option<String>,
    platform: Option<String>,
    released_between: Option<ReleaseWindow>,
}

impl FilterPredicate {
    fn from_query(query: &Query) -> Self {
        Self {
            search: query.active_search().map(str::to_lowercase),
            category: query.active_category().map(str::to_lowercase),
            genre: query.active_genre().map(str::to_lowercase),
            platform: query.active_platform().map(str::to_lowercase),
            released_between: query.released_between,
        }
    }

    fn matches(&self, item: &CatalogItem) -> bool {
        self.matches_search(item)
            && self.matches_category(item)
            && any_equal(self.genre.as_deref(), &item.genres)
            && any_equal(self.platform.as_deref(), &item.platforms)
            && self.matches_release(item)
    }

    fn matches_release(&self, item: &CatalogItem) -> bool {
        match self.released_between {
            None => true,
            Some(window) => item.released.is_some_and(|date| window.contains(date)),
        }
    }

    fn matches_search(&self, item: &CatalogItem) -> bool {
        let Some(term) = self.search.as_deref() else {
            return true;
        };
        item.name.to_lowercase().contains(term)
            || item
                .brand
                .as_deref()
                .is_some_and(|brand| brand.to_lowercase().contains(term))
    }

    fn matches_category(&self, item: &CatalogItem) -> bool {
        match self.category.as_deref() {
            None => true,
            Some(wanted) => item
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase() == wanted),
        }
    }
}

fn any_equal(wanted: Option<&str>, values: &[String]) -> bool {
    match wanted {
        None => true,
        Some(wanted) => values.iter().any(|v| v.to_lowercase() == wanted),
    }
}
