//! Trip fuel cost estimation.

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::models::FuelStation;

pub const DEFAULT_MILES_PER_GALLON: f64 = 10.0;
pub const DEFAULT_PRICE_PER_GALLON: f64 = 3.50;

/// Fuel spend for a whole trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripCostEstimate {
    pub total_distance_miles: f64,
    pub fuel_price_per_gallon: f64,
    pub miles_per_gallon: f64,
    pub total_gallons: f64,
    pub total_cost: f64,
}

/// Estimate the fuel spend for driving `total_distance_miles`.
pub fn estimate(
    total_distance_miles: f64,
    price_per_gallon: f64,
    miles_per_gallon: f64,
) -> TripCostEstimate {
    let total_gallons = total_distance_miles / miles_per_gallon;
    TripCostEstimate {
        total_distance_miles,
        fuel_price_per_gallon: price_per_gallon,
        miles_per_gallon,
        total_gallons,
        total_cost: total_gallons * price_per_gallon,
    }
}

/// Price policy for the trip estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FuelPricing {
    /// One flat price for the whole trip.
    Fixed { price_per_gallon: f64 },
    /// Mean price of the planned stops; `fallback_price_per_gallon` when
    /// the plan has none.
    StopAverage { fallback_price_per_gallon: f64 },
}

impl Default for FuelPricing {
    fn default() -> Self {
        FuelPricing::Fixed {
            price_per_gallon: DEFAULT_PRICE_PER_GALLON,
        }
    }
}

impl FuelPricing {
    pub fn validate(&self) -> Result<()> {
        let price = match self {
            FuelPricing::Fixed { price_per_gallon } => *price_per_gallon,
            FuelPricing::StopAverage {
                fallback_price_per_gallon,
            } => *fallback_price_per_gallon,
        };
        if price.is_finite() && price > 0.0 {
            Ok(())
        } else {
            Err(PlanError::InvalidConfig(format!(
                "fuel price must be positive, got {price}"
            )))
        }
    }

    /// Price per gallon to charge for a trip refueling at `stops`.
    pub fn price_for<'a, I>(&self, stops: I) -> f64
    where
        I: IntoIterator<Item = &'a FuelStation>,
    {
        match self {
            FuelPricing::Fixed { price_per_gallon } => *price_per_gallon,
            FuelPricing::StopAverage {
                fallback_price_per_gallon,
            } => {
                let (sum, count) = stops
                    .into_iter()
                    .fold((0.0, 0usize), |(sum, count), station| {
                        (sum + station.price_per_gallon, count + 1)
                    });
                if count == 0 {
                    *fallback_price_per_gallon
                } else {
                    sum / count as f64
                }
            }
        }
    }
}
