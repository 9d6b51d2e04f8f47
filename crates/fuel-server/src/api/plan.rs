//! Trip planning endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use fuel_core::{
    plan_trip, DirectionsResponse, DistanceUnit, FuelPricing, PlannerRules, RouteInput, TripPlan,
    WindowStrategy,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::state::AppState;

/// Per-request overrides of the configured planner rules.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanOptions {
    pub max_range_miles: Option<f64>,
    pub min_stop_spacing_miles: Option<f64>,
    pub proximity_threshold_miles: Option<f64>,
    pub miles_per_gallon: Option<f64>,
    pub window: Option<WindowStrategy>,
    pub fuel_pricing: Option<FuelPricing>,
}

impl PlanOptions {
    pub fn apply(&self, base: &PlannerRules) -> PlannerRules {
        let mut rules = base.clone();
        if let Some(miles) = self.max_range_miles {
            rules.max_range_miles = miles;
        }
        if let Some(miles) = self.min_stop_spacing_miles {
            rules.min_stop_spacing_miles = miles;
        }
        if let Some(miles) = self.proximity_threshold_miles {
            rules.proximity_threshold_miles = miles;
        }
        if let Some(mpg) = self.miles_per_gallon {
            rules.miles_per_gallon = mpg;
        }
        if let Some(window) = self.window {
            rules.window = window;
        }
        if let Some(pricing) = &self.fuel_pricing {
            rules.fuel_pricing = pricing.clone();
        }
        rules
    }
}

/// Either a raw `{geometry, distance_miles}` pair or a directions body.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanRouteRequest {
    #[serde(default)]
    pub geometry: Option<String>,
    #[serde(default)]
    pub distance_miles: Option<f64>,
    #[serde(default)]
    pub directions: Option<Value>,
    #[serde(default)]
    pub distance_unit: DistanceUnit,
    #[serde(default)]
    pub options: PlanOptions,
}

impl PlanRouteRequest {
    pub fn route_input(&self) -> Result<RouteInput, ApiError> {
        if let Some(directions) = &self.directions {
            let response = DirectionsResponse::from_value(directions.clone())?;
            return Ok(response.route_input(self.distance_unit)?);
        }
        match (&self.geometry, self.distance_miles) {
            (Some(geometry), Some(distance)) => Ok(RouteInput::new(geometry.clone(), distance)),
            (Some(_), None) => Err(ApiError::BadRequest(
                "distance_miles is required with geometry".to_string(),
            )),
            (None, _) => Err(ApiError::BadRequest(
                "either geometry or directions is required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanRouteResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub trip: TripPlan,
    pub catalog_size: usize,
    pub planned_at: DateTime<Utc>,
}

/// Plan fuel stops for one route against the current catalog snapshot.
pub async fn plan_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PlanRouteRequest>, JsonRejection>,
) -> Result<Json<PlanRouteResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let input = request.route_input()?;
    let rules = request.options.apply(state.rules());
    let catalog = state.catalog();
    let catalog_size = catalog.len();

    tracing::debug!(
        distance_miles = input.distance_miles,
        catalog_size,
        "planning route"
    );

    let trip = tokio::task::spawn_blocking(move || plan_trip(&input, &catalog, &rules)).await??;

    Ok(Json(PlanRouteResponse {
        ok: true,
        trip,
        catalog_size,
        planned_at: Utc::now(),
    }))
}
