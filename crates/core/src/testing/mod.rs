//! Testing utilities and mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use playaxis_core::testing::{fixtures, MockRemoteAdapter};
//!
//! let adapter = MockRemoteAdapter::new();
//! adapter.set_page(fixtures::raw_page(1..=12, 527)).await;
//!
//! // Use as CatalogSource::Remote(&adapter) or in AppState...
//! ```

mod mock_remote_adapter;

pub use mock_remote_adapter::MockRemoteAdapter;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{ItemId, LocalCatalog, NamedEntry, RawgGame, StaticCar};
    use crate::remote::RawPage;

    /// Create a RAWG game with reasonable defaults.
    pub fn raw_game(id: i64, name: &str) -> RawgGame {
        RawgGame {
            id: Some(ItemId::Int(id)),
            name: Some(name.to_string()),
            background_image: Some(format!("https://media.example/games/{}.jpg", id)),
            rating: Some(((id % 50) as f64) / 10.0),
            released: Some(format!("2023-{:02}-15", id % 12 + 1)),
            genres: Some(vec![NamedEntry::Named {
                name: "Action".to_string(),
            }]),
            platforms: Some(vec![NamedEntry::Plain("PC".to_string())]),
            added: Some(id as u64 * 100),
            ..Default::default()
        }
    }

    /// Create games named `Game {id}` for each id.
    pub fn raw_games(ids: impl IntoIterator<Item = i64>) -> Vec<RawgGame> {
        ids.into_iter()
            .map(|id| raw_game(id, &format!("Game {}", id)))
            .collect()
    }

    /// A page of generated games with an arbitrary upstream total.
    pub fn raw_page(ids: impl IntoIterator<Item = i64>, total_count: u64) -> RawPage {
        RawPage {
            items: raw_games(ids),
            total_count,
        }
    }

    /// Create a static car record.
    pub fn car(id: i64, name: &str, brand: &str, category: &str) -> StaticCar {
        StaticCar {
            id: Some(ItemId::Int(id)),
            name: Some(name.to_string()),
            brand: Some(brand.to_string()),
            image: Some(format!("/cars/{}.jpg", id)),
            category: Some(category.to_string()),
            wallpapers: Some(4),
        }
    }

    /// Sixteen cars, seven of them hypercars.
    pub fn sixteen_cars() -> LocalCatalog {
        let cars = [
            ("Porsche 918", "Porsche", "hypercar"),
            ("Audi R8", "Audi", "sports"),
            ("Bentley Continental", "Bentley", "luxury"),
            ("Bugatti Chiron", "Bugatti", "hypercar"),
            ("BMW M4", "BMW", "sports"),
            ("Ferrari SF90", "Ferrari", "hypercar"),
            ("Koenigsegg Jesko", "Koenigsegg", "hypercar"),
            ("Lamborghini Revuelto", "Lamborghini", "hypercar"),
            ("McLaren P1", "McLaren", "hypercar"),
            ("Rolls-Royce Phantom", "Rolls-Royce", "luxury"),
            ("Nissan GT-R", "Nissan", "jdm"),
            ("Toyota Supra", "Toyota", "jdm"),
            ("Tesla Model S", "Tesla", "electric"),
            ("Rimac Nevera", "Rimac", "hypercar"),
            ("Mercedes Vision", "Mercedes-Benz", "concept"),
            ("Maserati MC20", "Maserati", "sports"),
        ];
        let records: Vec<StaticCar> = cars
            .iter()
            .enumerate()
            .map(|(i, (name, brand, category))| car(i as i64 + 1, name, brand, category))
            .collect();
        LocalCatalog::from_records("cars", &records)
    }

    /// Eighteen cars with distinct names, in no particular name order.
    pub fn eighteen_named(prefix: &str) -> LocalCatalog {
        let records: Vec<StaticCar> = (1..=18)
            .map(|i| {
                // Names descend as ids ascend.
                let name = format!("{} {:02}", prefix, 19 - i);
                car(i, &name, prefix, "sports")
            })
            .collect();
        LocalCatalog::from_records("cars", &records)
    }
}
