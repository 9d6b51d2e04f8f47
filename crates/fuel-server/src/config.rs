//! Server configuration from environment.

use fuel_core::{FuelPricing, PlannerRules};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// JSON station catalog loaded at start-up
    pub stations_path: Option<PathBuf>,
    /// Planner defaults; requests may override individual values
    pub planner: PlannerRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            stations_path: None,
            planner: PlannerRules::default(),
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut planner = defaults.planner;

        if let Some(miles) = env_parse("FUEL_MAX_RANGE_MILES") {
            planner.max_range_miles = miles;
        }
        if let Some(miles) = env_parse("FUEL_MIN_STOP_SPACING_MILES") {
            planner.min_stop_spacing_miles = miles;
        }
        if let Some(miles) = env_parse("FUEL_PROXIMITY_MILES") {
            planner.proximity_threshold_miles = miles;
        }
        if let Some(mpg) = env_parse("FUEL_MILES_PER_GALLON") {
            planner.miles_per_gallon = mpg;
        }
        if let Some(price) = env_parse("FUEL_PRICE_PER_GALLON") {
            planner.fuel_pricing = FuelPricing::Fixed {
                price_per_gallon: price,
            };
        }

        Self {
            server_port: env_parse("FUEL_PORT").unwrap_or(defaults.server_port),
            stations_path: env::var("FUEL_STATIONS_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            planner,
        }
    }
}
