//! Catalog query engine.
//!
//! Raw records are normalized into [`CatalogItem`]s, then filtered, sorted
//! and paginated. [`QueryEngine`] composes these steps over a local catalog
//! or delegates them to a remote adapter.

mod cancel;
mod engine;
mod filter;
mod local;
mod normalize;
mod paginate;
mod sort;
mod types;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use engine::{call_upstream, CatalogSource, EngineConfig, ExecuteOptions, QueryEngine};
pub use filter::filter;
pub use local::LocalCatalog;
pub use normalize::{
    decode_rawg_games, normalize, normalize_all, ClipUrls, NamedEntry, PlatformRef, RawClip,
    RawRecord, RawgGame, StaticCar,
};
pub use paginate::{PageMeta, Paginator};
pub use sort::sort;
pub use types::*;
