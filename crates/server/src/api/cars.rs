//! Cars endpoints, answered from the bundled car catalog.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Serialize;

use playaxis_core::{datasets, CatalogItem};

use super::error::ApiError;
use super::games::parse_id;
use super::params::{BrowseParams, CarsResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct CarResponse {
    pub success: bool,
    pub car: CatalogItem,
}

/// GET /api/cars
///
/// Search, category filter, optional sort and paging over the car list.
/// Without a sort the list keeps its bundled order.
pub async fn list_cars(
    State(state): State<Arc<AppState>>,
    params: Result<Query<BrowseParams>, QueryRejection>,
) -> Result<Json<CarsResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::invalid_query(e.body_text()))?;
    let query = params.into_query(state.config().catalog.default_page_size, None)?;

    let page = state.engine().execute_local(state.cars(), &query)?;
    Ok(Json(CarsResponse::from(page)))
}

/// GET /api/cars/categories
pub async fn list_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        success: true,
        categories: datasets::car_categories().to_vec(),
    })
}

/// GET /api/cars/{id}
pub async fn get_car(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CarResponse>, ApiError> {
    let id = parse_id(&id);
    let car = state
        .cars()
        .get(&id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("Car not found: {}", id)))?;

    Ok(Json(CarResponse { success: true, car }))
}
