//! Bundled datasets.
//!
//! The car wallpaper list backs the local catalog. The fallback games are a
//! small known-good list served when the games API is unavailable.

use std::collections::HashSet;

use thiserror::Error;
use tracing::warn;

use crate::catalog::{ItemId, LocalCatalog, RawgGame, StaticCar};

const CARS_JSON: &str = include_str!("data/cars.json");
const FALLBACK_GAMES_JSON: &str = include_str!("data/fallback_games.json");

/// Category labels offered by the car browser, in display order.
pub const CAR_CATEGORIES: [&str; 7] = [
    "All", "Hypercar", "Sports", "Luxury", "Electric", "JDM", "Concept",
];

/// Note attached to responses built from the fallback games.
pub const FALLBACK_NOTE: &str = "Using fallback data - add RAWG API key for real data";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to parse dataset '{name}': {source}")]
    Parse {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The static car records, with duplicate ids renumbered.
pub fn cars() -> Result<Vec<StaticCar>, DatasetError> {
    let cars: Vec<StaticCar> = parse("cars", CARS_JSON)?;
    Ok(renumber_duplicates(cars))
}

/// The car records as a local catalog.
pub fn car_catalog() -> Result<LocalCatalog, DatasetError> {
    Ok(LocalCatalog::from_records("cars", &cars()?))
}

pub fn car_categories() -> &'static [&'static str] {
    &CAR_CATEGORIES
}

/// The known-good trending games list.
pub fn fallback_games() -> Result<Vec<RawgGame>, DatasetError> {
    parse("fallback_games", FALLBACK_GAMES_JSON)
}

fn parse<T: serde::de::DeserializeOwned>(
    name: &'static str,
    json: &str,
) -> Result<T, DatasetError> {
    serde_json::from_str(json).map_err(|source| DatasetError::Parse { name, source })
}

/// Give every car whose integer id was already used a fresh id past the
/// current maximum, in list order.
fn renumber_duplicates(mut cars: Vec<StaticCar>) -> Vec<StaticCar> {
    let mut next = cars
        .iter()
        .filter_map(|car| match car.id {
            Some(ItemId::Int(id)) => Some(id),
            _ => None,
        })
        .max()
        .unwrap_or(0);

    let mut seen = HashSet::new();
    for car in &mut cars {
        let Some(id) = car.id.clone() else {
            continue;
        };
        if seen.insert(id.clone()) {
            continue;
        }
        next += 1;
        warn!(
            "Car '{}' reuses id {}; renumbered to {}",
            car.name.as_deref().unwrap_or_default(),
            id,
            next
        );
        car.id = Some(ItemId::Int(next));
        seen.insert(ItemId::Int(next));
    }
    cars
}
