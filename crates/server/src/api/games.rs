//! Games endpoints backed by the remote games adapter.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use playaxis_core::{
    datasets::FALLBACK_NOTE, CatalogItem, CatalogSource, ItemId,
    Query as CatalogQuery, SortKey,
};

use super::error::ApiError;
use super::params::{BrowseParams, GamesResponse};
use crate::metrics::FALLBACK_SERVED;
use crate::state::AppState;

const RAWG: &str = "RAWG API";

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub success: bool,
    pub game: CatalogItem,
}

/// GET /api/all-games
///
/// Browse the full games catalog. Filtering, ordering and paging happen
/// upstream; the default order is highest rated first.
pub async fn all_games(
    State(state): State<Arc<AppState>>,
    params: Result<Query<BrowseParams>, QueryRejection>,
) -> Result<Json<GamesResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::invalid_query(e.body_text()))?;
    let query = params.into_query(
        state.config().catalog.default_page_size,
        Some(SortKey::RatingDesc),
    )?;

    let adapter = state.games().ok_or_else(|| ApiError::not_configured(RAWG))?;
    let page = state
        .engine()
        .execute(
            CatalogSource::Remote(adapter),
            &query,
            &state.execute_options(),
        )
        .await?;

    Ok(Json(GamesResponse::live(page)))
}

/// GET /api/trending-games
///
/// Most added games in the configured release window. When the upstream
/// fails and fallback is enabled, the bundled list is served instead and
/// marked `degraded`.
pub async fn trending_games(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GamesResponse>, ApiError> {
    let (window, page_size) = state.trending();
    let mut query = CatalogQuery::new()
        .with_sort(SortKey::RecentlyAdded)
        .with_page_size(page_size);
    query.released_between = window;

    let fallback_allowed = state.config().catalog.serve_fallback_on_upstream_error;

    let Some(adapter) = state.games() else {
        if fallback_allowed {
            info!("RAWG not configured, serving fallback trending games");
            return serve_fallback(&state, "trending", true);
        }
        return Err(ApiError::not_configured(RAWG));
    };

    match state
        .engine()
        .execute(
            CatalogSource::Remote(adapter),
            &query,
            &state.execute_options(),
        )
        .await
    {
        Ok(page) => Ok(Json(GamesResponse::live(page))),
        Err(e) if e.is_upstream() && fallback_allowed => {
            warn!("Trending games unavailable ({}), serving fallback", e);
            serve_fallback(&state, "trending", true)
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /api/trending-games/fallback
///
/// The bundled trending list, always.
pub async fn trending_fallback(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GamesResponse>, ApiError> {
    serve_fallback(&state, "trending_fallback", false)
}

/// GET /api/game/{id}
///
/// Details of one game, by numeric id or slug.
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let adapter = state.games().ok_or_else(|| ApiError::not_configured(RAWG))?;
    let id = parse_id(&id);

    match state
        .engine()
        .fetch_item(adapter, &id, &state.execute_options())
        .await
    {
        Ok(game) => Ok(Json(GameResponse {
            success: true,
            game,
        })),
        Err(e) if e.is_not_found() => Err(ApiError::not_found(format!("Game not found: {}", id))),
        Err(e) => Err(e.into()),
    }
}

fn serve_fallback(
    state: &AppState,
    endpoint: &str,
    degraded: bool,
) -> Result<Json<GamesResponse>, ApiError> {
    let games = state.fallback_games();
    let query = CatalogQuery::new().with_page_size(games.len().max(1) as u32);
    let page = state.engine().execute_local(games, &query)?;

    FALLBACK_SERVED.with_label_values(&[endpoint]).inc();
    Ok(Json(GamesResponse::fallback(page, degraded, FALLBACK_NOTE)))
}

/// Numeric ids stay numeric; anything else is treated as a slug.
pub fn parse_id(raw: &str) -> ItemId {
    raw.parse::<i64>()
        .map(ItemId::Int)
        .unwrap_or_else(|_| ItemId::Str(raw.to_string()))
}
