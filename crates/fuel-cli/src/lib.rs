//! Fuel CLI - command line tools for fuel stop planning.
//!
//! The `fuel-plan` binary plans trips locally from JSON files or submits a
//! route to a running `fuel-server`.

use clap::Args;
use fuel_core::{
    CatalogFormat, DirectionsResponse, DistanceUnit, FuelPricing, PlanError, PlannerRules, RouteInput,
    StationCatalog, WindowStrategy,
};
use serde_json::{json, Value};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid CSV in {path}: {source}")]
    Csv { path: String, source: csv::Error },
    #[error("route file must contain `routes`, or `geometry` and `distance_miles`")]
    UnknownLayout,
    #[error(transparent)]
    Directions(#[from] PlanError),
}

/// Planner overrides shared by the `plan` and `submit` commands.
#[derive(Args, Debug, Clone)]
pub struct RuleArgs {
    /// Vehicle range per tank, miles
    #[arg(long, default_value_t = 500.0)]
    pub max_range_miles: f64,

    /// Minimum straight-line distance between consecutive stops, miles
    #[arg(long, default_value_t = 300.0)]
    pub min_stop_spacing_miles: f64,

    /// Maximum distance of a station from the route, miles
    #[arg(long, default_value_t = 5.0)]
    pub proximity_miles: f64,

    #[arg(long, default_value_t = 10.0)]
    pub mpg: f64,

    /// Fixed fuel price per gallon used for the trip cost
    #[arg(long, default_value_t = 3.50)]
    pub price: f64,

    /// Use the legacy waypoint-index window instead of cumulative mileage
    #[arg(long)]
    pub waypoint_index_window: bool,
}

impl RuleArgs {
    pub fn to_rules(&self) -> PlannerRules {
        PlannerRules {
            max_range_miles: self.max_range_miles,
            min_stop_spacing_miles: self.min_stop_spacing_miles,
            proximity_threshold_miles: self.proximity_miles,
            miles_per_gallon: self.mpg,
            window: self.window(),
            fuel_pricing: FuelPricing::Fixed {
                price_per_gallon: self.price,
            },
            ..PlannerRules::default()
        }
    }

    fn window(&self) -> WindowStrategy {
        if self.waypoint_index_window {
            WindowStrategy::WaypointIndex
        } else {
            WindowStrategy::Cumulative
        }
    }

    /// Overrides in the server's request `options` shape.
    pub fn to_options(&self) -> Value {
        json!({
            "max_range_miles": self.max_range_miles,
            "min_stop_spacing_miles": self.min_stop_spacing_miles,
            "proximity_threshold_miles": self.proximity_miles,
            "miles_per_gallon": self.mpg,
            "window": self.window(),
            "fuel_pricing": {"mode": "fixed", "price_per_gallon": self.price},
        })
    }
}

/// Route from a directions body or a `{geometry, distance_miles}` object.
pub fn parse_route(value: Value, unit: DistanceUnit) -> Result<RouteInput, InputError> {
    if value.get("routes").is_some() {
        return Ok(DirectionsResponse::from_value(value)?.route_input(unit)?);
    }
    if value.get("geometry").is_some() && value.get("distance_miles").is_some() {
        return serde_json::from_value(value).map_err(|source| InputError::Json {
            path: "route".to_string(),
            source,
        });
    }
    Err(InputError::UnknownLayout)
}

fn read_json(path: &Path) -> Result<Value, InputError> {
    let display = path.display().to_string();
    let body = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&body).map_err(|source| InputError::Json {
        path: display,
        source,
    })
}

pub fn load_route(path: &Path, unit: DistanceUnit) -> Result<RouteInput, InputError> {
    parse_route(read_json(path)?, unit)
}

/// Station catalog from a `.csv` price export or a JSON file.
pub fn load_stations(path: &Path) -> Result<StationCatalog, InputError> {
    let display = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|source| InputError::Io {
        path: display.clone(),
        source,
    })?;
    let reader = std::io::BufReader::new(file);
    match CatalogFormat::for_path(path) {
        CatalogFormat::Json => StationCatalog::from_json_reader(reader)
            .map_err(|source| InputError::Json { path: display, source }),
        CatalogFormat::Csv => StationCatalog::from_csv_reader(reader)
            .map_err(|source| InputError::Csv { path: display, source }),
    }
}

/// Request body for `POST /v1/routes/plan`.
pub fn plan_request(input: &RouteInput, rules: &RuleArgs) -> Value {
    json!({
        "geometry": input.geometry,
        "distance_miles": input.distance_miles,
        "options": rules.to_options(),
    })
}
