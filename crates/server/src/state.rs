use std::sync::Arc;

use playaxis_core::{
    cancel_pair, CancelHandle, Config, ExecuteOptions, LocalCatalog, QueryEngine, ReleaseWindow,
    RemoteAdapter, SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    engine: QueryEngine,
    cars: LocalCatalog,
    fallback_games: LocalCatalog,
    games: Option<Arc<dyn RemoteAdapter>>,
    /// Cancels every in-flight upstream call when the server shuts down.
    shutdown: CancelHandle,
}

impl AppState {
    pub fn new(
        config: Config,
        cars: LocalCatalog,
        fallback_games: LocalCatalog,
        games: Option<Arc<dyn RemoteAdapter>>,
    ) -> Self {
        let (shutdown, _) = cancel_pair();
        Self {
            engine: QueryEngine::new(config.catalog.engine_config()),
            config,
            cars,
            fallback_games,
            games,
            shutdown,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    pub fn cars(&self) -> &LocalCatalog {
        &self.cars
    }

    pub fn fallback_games(&self) -> &LocalCatalog {
        &self.fallback_games
    }

    /// The games adapter, if RAWG is configured.
    pub fn games(&self) -> Option<&dyn RemoteAdapter> {
        self.games.as_deref()
    }

    /// Options for one upstream call: the configured deadline plus the
    /// server-wide shutdown signal.
    pub fn execute_options(&self) -> ExecuteOptions {
        ExecuteOptions::default()
            .with_timeout(self.config.catalog.upstream_timeout())
            .with_cancel(self.shutdown.signal())
    }

    /// Trending games window and page size.
    pub fn trending(&self) -> (Option<ReleaseWindow>, u32) {
        let rawg = self.config.rawg.clone().unwrap_or_default();
        (
            ReleaseWindow::parse(&rawg.trending_window),
            rawg.trending_page_size,
        )
    }

    /// Withdraw all in-flight upstream calls.
    pub fn cancel_in_flight(&self) {
        self.shutdown.cancel();
    }
}
