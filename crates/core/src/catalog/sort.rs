//! Stable ordering of items by [`SortKey`].

use std::cmp::Ordering;

use super::types::{CatalogError, CatalogItem, SortKey};

/// Name reported in [`CatalogError::UnsupportedSortKey`] for in-memory data.
const LOCAL_SOURCE: &str = "the local catalog";

/// Return `items` ordered by `key`.
///
/// The sort is stable: items with equal keys keep their input order.
/// [`SortKey::RecentlyAdded`] requires every item to carry an `added_order`;
/// otherwise the call fails instead of falling back to another ordering.
pub fn sort(items: &[CatalogItem], key: SortKey) -> Result<Vec<CatalogItem>, CatalogError> {
    if key == SortKey::RecentlyAdded && items.iter().any(|i| i.added_order.is_none()) {
        return Err(CatalogError::UnsupportedSortKey {
            key,
            source_name: LOCAL_SOURCE.to_string(),
        });
    }

    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| compare(a, b, key));
    Ok(sorted)
}

fn compare(a: &CatalogItem, b: &CatalogItem, key: SortKey) -> Ordering {
    match key {
        SortKey::RatingDesc => b.sort_rating().total_cmp(&a.sort_rating()),
        SortKey::ReleaseDesc => match (a.released, b.released) {
            (Some(da), Some(db)) => db.cmp(&da),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::RecentlyAdded => b.added_order.cmp(&a.added_order),
    }
}
