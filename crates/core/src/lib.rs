pub mod catalog;
pub mod config;
pub mod datasets;
pub mod metrics;
pub mod remote;
pub mod testing;

pub use catalog::{
    cancel_pair, CancelHandle, CancelSignal, CatalogError, CatalogItem, CatalogSource,
    EngineConfig, ExecuteOptions, ItemId, LocalCatalog, PageResult, Query, QueryEngine,
    ReleaseWindow, SortKey,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CatalogConfig, Config, ConfigError,
    LogFormat, SanitizedConfig,
};
pub use datasets::DatasetError;
pub use remote::{AdapterError, FetchParams, RawPage, RawgClient, RawgConfig, RemoteAdapter};
