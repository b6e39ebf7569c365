//! In-memory catalogs built from static record lists.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use super::normalize::{normalize_all, RawRecord};
use super::types::{CatalogItem, ItemId};

/// An immutable, normalized item list served in local mode.
///
/// Cloning is cheap; all clones share the same items.
#[derive(Debug, Clone)]
pub struct LocalCatalog {
    name: String,
    items: Arc<[CatalogItem]>,
}

impl LocalCatalog {
    /// Normalize `records` once and build a catalog from them.
    ///
    /// Malformed records are skipped. Records without an insertion index get
    /// their position in the list, so "recently added" ordering is defined.
    pub fn from_records<R: RawRecord>(name: impl Into<String>, records: &[R]) -> Self {
        let mut items = normalize_all(records);
        for (index, item) in items.iter_mut().enumerate() {
            if item.added_order.is_none() {
                item.added_order = Some(index as u64);
            }
        }
        Self::from_items(name, items)
    }

    /// Build a catalog from already normalized items.
    ///
    /// Items whose id was already seen are dropped, keeping the first.
    pub fn from_items(name: impl Into<String>, items: Vec<CatalogItem>) -> Self {
        let name = name.into();
        let mut seen = HashSet::new();
        let items: Vec<CatalogItem> = items
            .into_iter()
            .filter(|item| {
                let fresh = seen.insert(item.id.clone());
                if !fresh {
                    warn!(catalog = %name, id = %item.id, "Dropping item with duplicate id");
                }
                fresh
            })
            .collect();

        debug!(catalog = %name, count = items.len(), "Local catalog ready");

        Self {
            name,
            items: items.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All items in source order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
