//! One-call trip planning: decode, plan, price, assemble.

use serde::{Deserialize, Serialize};

use crate::catalog::StationCatalog;
use crate::cost::{estimate, TripCostEstimate};
use crate::error::Result;
use crate::geojson::{assemble, FeatureCollection};
use crate::models::RouteInput;
use crate::planner::{PlannedStop, RangePlanner};
use crate::rules::PlannerRules;

/// Everything a caller needs to render and bill a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub stops: Vec<PlannedStop>,
    /// Trip cost rounded to cents
    pub total_fuel_cost: f64,
    pub cost: TripCostEstimate,
    pub total_distance_miles: f64,
    /// Encoded geometry, passed through unchanged
    pub route_geometry: String,
    pub feature_collection: FeatureCollection,
}

/// Plan stops and cost for `input` against a catalog snapshot.
pub fn plan_trip(
    input: &RouteInput,
    catalog: &StationCatalog,
    rules: &PlannerRules,
) -> Result<TripPlan> {
    let route = input.decode()?;
    let plan = RangePlanner::new(rules).plan(&route, catalog)?;

    let price = rules.fuel_pricing.price_for(plan.stations());
    let cost = estimate(route.total_distance_miles, price, rules.miles_per_gallon);
    let total_fuel_cost = round_cents(cost.total_cost);
    let feature_collection = assemble(
        &route.waypoints,
        &plan,
        total_fuel_cost,
        route.total_distance_miles,
    );

    tracing::info!(
        distance_miles = route.total_distance_miles,
        waypoints = route.waypoints.len(),
        stops = plan.len(),
        total_cost = cost.total_cost,
        "planned trip"
    );

    Ok(TripPlan {
        stops: plan.stops,
        total_fuel_cost,
        cost,
        total_distance_miles: route.total_distance_miles,
        route_geometry: input.geometry.clone(),
        feature_collection,
    })
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
