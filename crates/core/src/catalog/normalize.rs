//! Conversion of raw source records into [`CatalogItem`].
//!
//! Two record shapes exist: games as returned by a RAWG-style API (and the
//! bundled fallback list, which flattens genres and platforms to strings) and
//! cars from the static wallpaper list. Both implement [`RawRecord`].

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::types::{CatalogError, CatalogItem, ItemId};
use crate::metrics::MALFORMED_RECORDS;

/// A raw record that can be turned into a canonical item.
pub trait RawRecord {
    /// Short name of the record source, used in logs and metric labels.
    fn source_name(&self) -> &'static str;

    /// Convert into a [`CatalogItem`].
    ///
    /// Fails with [`CatalogError::MalformedRecord`] only when the id or the
    /// name is missing or empty. Missing optional fields become absent values.
    fn normalize(&self) -> Result<CatalogItem, CatalogError>;
}

/// Normalize one record.
pub fn normalize<R: RawRecord>(raw: &R) -> Result<CatalogItem, CatalogError> {
    raw.normalize()
}

/// Normalize a batch, skipping (and logging) malformed records.
pub fn normalize_all<'a, R, I>(records: I) -> Vec<CatalogItem>
where
    R: RawRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .filter_map(|raw| match raw.normalize() {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(source = raw.source_name(), "Skipping record: {}", e);
                MALFORMED_RECORDS
                    .with_label_values(&[raw.source_name()])
                    .inc();
                None
            }
        })
        .collect()
}

/// A named entry that is either a plain string or an object with a `name`.
///
/// RAWG returns `{"name": "Action", ...}` for genres and
/// `{"platform": {"name": "PC"}}` for platforms, while flattened lists
/// carry the names directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NamedEntry {
    Plain(String),
    Named { name: String },
    Platform { platform: PlatformRef },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRef {
    pub name: String,
}

impl NamedEntry {
    pub fn name(&self) -> &str {
        match self {
            NamedEntry::Plain(name) => name,
            NamedEntry::Named { name } => name,
            NamedEntry::Platform { platform } => &platform.name,
        }
    }
}

/// Clip links attached to a RAWG game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawClip {
    Url(String),
    Clips { clips: ClipUrls },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipUrls {
    #[serde(default)]
    pub full: Option<String>,
}

/// A game record as returned by a RAWG-style API.
///
/// Every field is read leniently: a value of the wrong type becomes absent
/// instead of failing the record (or the page it arrived in). Records left
/// without an id or a name are then rejected by [`RawRecord::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawgGame {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<ItemId>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub background_image: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub released: Option<String>,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub genres: Option<Vec<NamedEntry>>,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub platforms: Option<Vec<NamedEntry>>,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub developers: Option<Vec<NamedEntry>>,
    /// Number of users who added the game. A popularity count, not an
    /// insertion index, so it never becomes `added_order`.
    #[serde(default, deserialize_with = "lenient")]
    pub added: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub clip: Option<RawClip>,
    /// Plain-text description (detail endpoint only).
    #[serde(default, deserialize_with = "lenient")]
    pub description_raw: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A list where unreadable entries are dropped one by one.
fn lenient_entries<'de, D>(deserializer: D) -> Result<Option<Vec<NamedEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
    ))
}

/// Decode a batch of RAWG records, skipping (and counting) entries that are
/// not JSON objects.
pub fn decode_rawg_games(values: Vec<Value>) -> Vec<RawgGame> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawgGame>(value) {
            Ok(game) => Some(game),
            Err(e) => {
                warn!(source = "rawg", "Skipping undecodable record: {}", e);
                MALFORMED_RECORDS.with_label_values(&["rawg"]).inc();
                None
            }
        })
        .collect()
}

impl RawRecord for RawgGame {
    fn source_name(&self) -> &'static str {
        "rawg"
    }

    fn normalize(&self) -> Result<CatalogItem, CatalogError> {
        let (id, name) = required(self.id.as_ref(), self.name.as_deref())?;

        Ok(CatalogItem {
            id,
            name,
            image_url: non_empty(self.background_image.as_deref()),
            rating: self.rating.and_then(clamp_rating),
            released: self.released.as_deref().and_then(parse_date),
            genres: names(self.genres.as_deref()),
            platforms: names(self.platforms.as_deref()),
            category: None,
            brand: self
                .developers
                .as_deref()
                .and_then(|d| d.first())
                .map(|d| d.name().to_string()),
            added_order: None,
            clip_url: self.clip.as_ref().and_then(|clip| match clip {
                RawClip::Url(url) => non_empty(Some(url)),
                RawClip::Clips { clips } => non_empty(clips.full.as_deref()),
            }),
            wallpaper_count: None,
            description: non_empty(self.description_raw.as_deref()),
        })
    }
}

/// A car record from the static wallpaper list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticCar {
    #[serde(default)]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub wallpapers: Option<u32>,
}

impl RawRecord for StaticCar {
    fn source_name(&self) -> &'static str {
        "static_car"
    }

    fn normalize(&self) -> Result<CatalogItem, CatalogError> {
        let (id, name) = required(self.id.as_ref(), self.name.as_deref())?;

        let mut item = CatalogItem::new(id, name);
        item.image_url = non_empty(self.image.as_deref());
        item.category = non_empty(self.category.as_deref()).map(|c| c.to_lowercase());
        item.brand = non_empty(self.brand.as_deref());
        item.wallpaper_count = self.wallpapers;
        Ok(item)
    }
}

fn required(id: Option<&ItemId>, name: Option<&str>) -> Result<(ItemId, String), CatalogError> {
    let id = match id {
        Some(ItemId::Str(s)) if s.trim().is_empty() => None,
        other => other.cloned(),
    }
    .ok_or_else(|| CatalogError::MalformedRecord("missing id".to_string()))?;

    let name = non_empty(name)
        .ok_or_else(|| CatalogError::MalformedRecord(format!("record {} has no name", id)))?;

    Ok((id, name))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn names(entries: Option<&[NamedEntry]>) -> Vec<String> {
    entries
        .unwrap_or_default()
        .iter()
        .map(|e| e.name().trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

fn clamp_rating(rating: f64) -> Option<f64> {
    if rating.is_nan() {
        None
    } else {
        Some(rating.clamp(0.0, 5.0))
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{sort, LocalCatalog, SortKey};
    use serde_json::json;

    #[test]
    fn test_rawg_api_shape() {
        let raw: RawgGame = serde_json::from_value(json!({
            "id": 3498,
            "name": "Grand Theft Auto V",
            "background_image": "https://media.rawg.io/gta.jpg",
            "rating": 4.47,
            "released": "2013-09-17",
            "added": 21000,
            "genres": [{"id": 4, "name": "Action"}, {"id": 3, "name": "Adventure"}],
            "platforms": [
                {"platform": {"id": 4, "name": "PC"}},
                {"platform": {"id": 187, "name": "PlayStation 5"}}
            ],
            "clip": {"clips": {"full": "https://media.rawg.io/clip.mp4"}}
        }))
        .unwrap();

        let item = normalize(&raw).unwrap();
        assert_eq!(item.id, ItemId::Int(3498));
        assert_eq!(item.name, "Grand Theft Auto V");
        assert_eq!(item.rating, Some(4.47));
        assert_eq!(item.released, NaiveDate::from_ymd_opt(2013, 9, 17));
        assert_eq!(item.genres, vec!["Action", "Adventure"]);
        assert_eq!(item.platforms, vec!["PC", "PlayStation 5"]);
        assert!(item.added_order.is_none());
        assert_eq!(item.clip_url.as_deref(), Some("https://media.rawg.io/clip.mp4"));
    }

    #[test]
    fn test_flattened_fallback_shape() {
        let raw: RawgGame = serde_json::from_value(json!({
            "id": 2,
            "name": "Baldur's Gate 3",
            "rating": 4.8,
            "released": "2023-08-03",
            "genres": ["RPG", "Adventure"],
            "platforms": ["PC", "PS5", "Xbox Series X/S"]
        }))
        .unwrap();

        let item = normalize(&raw).unwrap();
        assert_eq!(item.genres, vec!["RPG", "Adventure"]);
        assert_eq!(item.platforms, vec!["PC", "PS5", "Xbox Series X/S"]);
        assert!(item.image_url.is_none());
        assert!(item.added_order.is_none());
    }

    #[test]
    fn test_missing_optional_fields_become_absent() {
        let raw = RawgGame {
            id: Some(ItemId::Int(1)),
            name: Some("Bare".into()),
            released: Some("TBA".into()),
            ..Default::default()
        };
        let item = normalize(&raw).unwrap();
        assert!(item.rating.is_none());
        assert!(item.released.is_none());
        assert!(item.genres.is_empty());
        assert!(item.platforms.is_empty());
    }

    fn raw_named(id: i64, name: &str) -> RawgGame {
        RawgGame {
            id: Some(ItemId::Int(id)),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_mistyped_fields_become_absent() {
        let raw: RawgGame = serde_json::from_value(json!({
            "id": 9,
            "name": "Odd",
            "rating": "N/A",
            "released": 2020,
            "added": -4,
            "genres": [{"id": 4}, {"name": "Indie"}],
            "platforms": "PC"
        }))
        .unwrap();

        let item = normalize(&raw).unwrap();
        assert_eq!(item.name, "Odd");
        assert!(item.rating.is_none());
        assert!(item.released.is_none());
        assert!(item.added_order.is_none());
        assert_eq!(item.genres, vec!["Indie"]);
        assert!(item.platforms.is_empty());
    }

    #[test]
    fn test_decode_rawg_games_skips_non_objects() {
        let games = decode_rawg_games(vec![
            json!({"id": 1, "name": "Good"}),
            json!("not a game"),
            json!({"id": true, "name": "Bad id"}),
        ]);
        assert_eq!(games.len(), 2);

        let items = normalize_all(&games);
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Good"]);
    }

    #[test]
    fn test_popularity_count_does_not_rank_local_recently_added() {
        let games = vec![
            RawgGame {
                added: Some(90000),
                ..raw_named(1, "Popular and old")
            },
            RawgGame {
                added: Some(5),
                ..raw_named(2, "Obscure and new")
            },
        ];
        let catalog = LocalCatalog::from_records("games", &games);
        let sorted = sort(catalog.items(), SortKey::RecentlyAdded).unwrap();
        assert_eq!(sorted[0].name, "Obscure and new");
    }

    #[test]
    fn test_rating_is_clamped() {
        let raw = RawgGame {
            id: Some(ItemId::Int(1)),
            name: Some("Overrated".into()),
            rating: Some(9.1),
            ..Default::default()
        };
        assert_eq!(normalize(&raw).unwrap().rating, Some(5.0));
    }

    #[test]
    fn test_missing_id_or_name_is_malformed() {
        let no_id = RawgGame {
            name: Some("Nameless id".into()),
            ..Default::default()
        };
        assert!(matches!(
            normalize(&no_id),
            Err(CatalogError::MalformedRecord(_))
        ));

        let empty_name = StaticCar {
            id: Some(ItemId::Int(3)),
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(
            normalize(&empty_name),
            Err(CatalogError::MalformedRecord(_))
        ));

        let empty_id = StaticCar {
            id: Some(ItemId::Str(String::new())),
            name: Some("Ghost".into()),
            ..Default::default()
        };
        assert!(matches!(
            normalize(&empty_id),
            Err(CatalogError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_static_car_lowercases_category() {
        let raw: StaticCar = serde_json::from_value(json!({
            "id": 1,
            "name": "Porsche",
            "brand": "Porsche",
            "wallpapers": 3,
            "image": "/porsche.webp",
            "category": "Hypercar"
        }))
        .unwrap();

        let item = normalize(&raw).unwrap();
        assert_eq!(item.category.as_deref(), Some("hypercar"));
        assert_eq!(item.brand.as_deref(), Some("Porsche"));
        assert_eq!(item.wallpaper_count, Some(3));
        assert_eq!(item.image_url.as_deref(), Some("/porsche.webp"));
    }

    #[test]
    fn test_normalize_all_skips_malformed() {
        let records = vec![
            StaticCar {
                id: Some(ItemId::Int(1)),
                name: Some("Audi".into()),
                ..Default::default()
            },
            StaticCar {
                id: None,
                name: Some("Broken".into()),
                ..Default::default()
            },
            StaticCar {
                id: Some(ItemId::Int(3)),
                name: Some("BMW".into()),
                ..Default::default()
            },
        ];

        let items = normalize_all(&records);
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Audi", "BMW"]);
    }
}
