//! Station catalog endpoints.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    Json,
};
use fuel_core::{FuelStation, StationCatalog};
use serde::Serialize;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StationListResponse {
    pub count: usize,
    pub skipped: usize,
    pub stations: Vec<FuelStation>,
}

#[derive(Debug, Serialize)]
pub struct CatalogUpdateResponse {
    pub accepted: usize,
    pub skipped: usize,
}

/// List the current catalog snapshot.
pub async fn list_stations(State(state): State<Arc<AppState>>) -> Json<StationListResponse> {
    let catalog = state.catalog();
    Json(StationListResponse {
        count: catalog.len(),
        skipped: catalog.skipped(),
        stations: catalog.stations().to_vec(),
    })
}

/// Get a single station by id.
pub async fn get_station(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FuelStation>, ApiError> {
    state
        .catalog()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("station {id}")))
}

fn is_csv(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/csv"))
}

/// Replace the catalog with the records in the request body.
///
/// A `text/csv` body is read as a price export; anything else as a JSON
/// list of records or an object keyed by station id.
pub async fn replace_stations(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<CatalogUpdateResponse>, ApiError> {
    let catalog = if is_csv(&headers) {
        StationCatalog::from_csv_reader(body.as_bytes())
            .map_err(|err| ApiError::BadRequest(format!("invalid station CSV: {err}")))?
    } else {
        StationCatalog::from_json_str(&body)
            .map_err(|err| ApiError::BadRequest(format!("invalid station catalog: {err}")))?
    };
    let response = CatalogUpdateResponse {
        accepted: catalog.len(),
        skipped: catalog.skipped(),
    };
    let previous = state.replace_catalog(catalog);
    tracing::info!(
        accepted = response.accepted,
        skipped = response.skipped,
        previous = previous.len(),
        "replaced station catalog"
    );
    Ok(Json(response))
}
