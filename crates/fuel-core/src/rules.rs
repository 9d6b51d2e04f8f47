//! Planning rules and thresholds.

use serde::{Deserialize, Serialize};

use crate::cost::FuelPricing;
use crate::error::{PlanError, Result};
use crate::proximity::WindowStrategy;

/// Accepted range for the no-match retry increment, in miles.
pub const NO_MATCH_RETRY_RANGE_MILES: std::ops::RangeInclusive<f64> = 50.0..=100.0;

/// Configuration for the range planner and cost estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerRules {
    /// Distance covered by one full tank
    pub max_range_miles: f64,
    /// Minimum great-circle distance between consecutive stops
    pub min_stop_spacing_miles: f64,
    /// Maximum distance from a sampled waypoint for a station to qualify
    pub proximity_threshold_miles: f64,
    /// Vehicle fuel economy used for the cost estimate
    pub miles_per_gallon: f64,
    /// Stations this close to the route start are never candidates
    pub starting_point_exclusion_miles: f64,
    /// Advance when no station qualifies in a segment
    pub no_match_retry_miles: f64,
    /// Advance when the cheapest candidate is too close to the previous stop
    pub spacing_retry_miles: f64,
    /// Waypoint step used when sampling a window
    pub sample_stride: usize,
    /// How mileage windows map onto waypoints
    pub window: WindowStrategy,
    /// Which price the trip cost estimate uses
    pub fuel_pricing: FuelPricing,
}

impl Default for PlannerRules {
    fn default() -> Self {
        Self {
            max_range_miles: 500.0,
            min_stop_spacing_miles: 300.0,
            proximity_threshold_miles: 5.0,
            miles_per_gallon: 10.0,
            starting_point_exclusion_miles: 50.0,
            no_match_retry_miles: 50.0,
            spacing_retry_miles: 100.0,
            sample_stride: 10,
            window: WindowStrategy::default(),
            fuel_pricing: FuelPricing::default(),
        }
    }
}

impl PlannerRules {
    /// Reject settings the planner loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(PlanError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )))
            }
        }

        fn non_negative(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(PlanError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )))
            }
        }

        positive("max_range_miles", self.max_range_miles)?;
        non_negative("min_stop_spacing_miles", self.min_stop_spacing_miles)?;
        positive("proximity_threshold_miles", self.proximity_threshold_miles)?;
        positive("miles_per_gallon", self.miles_per_gallon)?;
        non_negative(
            "starting_point_exclusion_miles",
            self.starting_point_exclusion_miles,
        )?;
        positive("spacing_retry_miles", self.spacing_retry_miles)?;

        if !NO_MATCH_RETRY_RANGE_MILES.contains(&self.no_match_retry_miles) {
            return Err(PlanError::InvalidConfig(format!(
                "no_match_retry_miles must be within {}..={}, got {}",
                NO_MATCH_RETRY_RANGE_MILES.start(),
                NO_MATCH_RETRY_RANGE_MILES.end(),
                self.no_match_retry_miles
            )));
        }
        if self.sample_stride == 0 {
            return Err(PlanError::InvalidConfig(
                "sample_stride must be at least 1".to_string(),
            ));
        }
        self.fuel_pricing.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let rules = PlannerRules::default();
        assert_eq!(rules.max_range_miles, 500.0);
        assert_eq!(rules.min_stop_spacing_miles, 300.0);
        assert_eq!(rules.proximity_threshold_miles, 5.0);
        assert_eq!(rules.miles_per_gallon, 10.0);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn retry_increment_outside_range_is_rejected() {
        let mut rules = PlannerRules::default();
        rules.no_match_retry_miles = 0.0;
        assert!(matches!(rules.validate(), Err(PlanError::InvalidConfig(_))));
        rules.no_match_retry_miles = 150.0;
        assert!(rules.validate().is_err());
        rules.no_match_retry_miles = 100.0;
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn zero_stride_and_range_are_rejected() {
        let mut rules = PlannerRules::default();
        rules.sample_stride = 0;
        assert!(rules.validate().is_err());

        let mut rules = PlannerRules::default();
        rules.max_range_miles = 0.0;
        assert!(rules.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let rules: PlannerRules =
            serde_json::from_str(r#"{"max_range_miles": 350}"#).expect("parse rules");
        assert_eq!(rules.max_range_miles, 350.0);
        assert_eq!(rules.sample_stride, 10);
    }
}
