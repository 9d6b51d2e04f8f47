//! Range-bounded refueling stop selection.
//!
//! The planner walks the reported route distance one tank at a time. For each
//! segment it picks the cheapest station lying close to the segment's
//! geometry, subject to a minimum spacing from the previous stop. When a
//! segment yields nothing usable the search window slides forward by a fixed
//! increment instead of failing, so a sparse catalog produces a shorter plan
//! rather than an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog::StationCatalog;
use crate::error::{PlanError, Result};
use crate::models::{FuelStation, GeoPoint, Route};
use crate::proximity::{ProximityIndex, ProximityMatch};
use crate::rules::PlannerRules;
use crate::spatial::{distance, path_length};

/// Largest accepted ratio of reported distance to the longer of geometry
/// length and one tank of range.
pub const MAX_DISTANCE_RATIO: f64 = 10.0;

/// One accepted refueling stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedStop {
    pub station: FuelStation,
    /// Route mileage of the waypoint sample closest to the station
    pub route_mile: f64,
    /// Distance from that sample to the station
    pub distance_from_route_miles: f64,
    /// Mileage window the stop was selected for
    pub segment_start_mile: f64,
    pub segment_end_mile: f64,
}

/// Ordered stops for one trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopPlan {
    pub stops: Vec<PlannedStop>,
}

impl StopPlan {
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn stations(&self) -> impl Iterator<Item = &FuelStation> {
        self.stops.iter().map(|stop| &stop.station)
    }
}

/// Stations eligible for any segment of `route`.
///
/// Keeps the cheapest station per exact location (the first one on a price
/// tie) in catalog order, and drops stations within `exclusion_miles` of the
/// route start.
pub fn candidate_stations<'a>(
    stations: &'a [FuelStation],
    origin: GeoPoint,
    exclusion_miles: f64,
) -> Vec<&'a FuelStation> {
    let mut by_location: HashMap<(u64, u64), usize> = HashMap::new();
    let mut candidates: Vec<&FuelStation> = Vec::new();

    for station in stations {
        if distance(origin, station.location) <= exclusion_miles {
            continue;
        }
        // Adding 0.0 folds -0.0 into 0.0 so both spellings share a key.
        let key = (
            (station.location.latitude + 0.0).to_bits(),
            (station.location.longitude + 0.0).to_bits(),
        );
        match by_location.get(&key) {
            Some(&slot) => {
                if station.price_per_gallon < candidates[slot].price_per_gallon {
                    candidates[slot] = station;
                }
            }
            None => {
                by_location.insert(key, candidates.len());
                candidates.push(station);
            }
        }
    }

    candidates
}

/// Greedy segment-by-segment stop selection.
#[derive(Debug, Clone)]
pub struct RangePlanner<'r> {
    rules: &'r PlannerRules,
}

impl<'r> RangePlanner<'r> {
    pub fn new(rules: &'r PlannerRules) -> Self {
        Self { rules }
    }

    /// Plan refueling stops for `route` from `catalog`.
    ///
    /// Returns an empty plan when one tank covers the reported distance.
    pub fn plan(&self, route: &Route, catalog: &StationCatalog) -> Result<StopPlan> {
        let rules = self.rules;
        rules.validate()?;

        let Some(origin) = route.origin() else {
            return Err(PlanError::EmptyGeometry);
        };

        let total = route.total_distance_miles;
        if !total.is_finite() || total <= 0.0 {
            let geometry_miles = path_length(&route.waypoints);
            if !total.is_finite() || geometry_miles > rules.max_range_miles {
                return Err(PlanError::ZeroDistance {
                    reported_miles: total,
                    geometry_miles,
                });
            }
        }

        if total <= rules.max_range_miles {
            tracing::debug!(
                total_distance_miles = total,
                max_range_miles = rules.max_range_miles,
                "trip fits in one tank"
            );
            return Ok(StopPlan::default());
        }

        let geometry_miles = path_length(&route.waypoints);
        if total > geometry_miles.max(rules.max_range_miles) * MAX_DISTANCE_RATIO {
            return Err(PlanError::DistanceMismatch {
                reported_miles: total,
                geometry_miles,
            });
        }

        if catalog.is_empty() {
            return Err(PlanError::InsufficientStationData {
                skipped: catalog.skipped(),
            });
        }

        let candidates = candidate_stations(
            catalog.stations(),
            origin,
            rules.starting_point_exclusion_miles,
        );
        tracing::debug!(
            catalog = catalog.len(),
            candidates = candidates.len(),
            "prepared candidate stations"
        );

        let index = ProximityIndex::new(route, rules.sample_stride, rules.window);
        Ok(self.walk(total, &index, &candidates))
    }

    fn walk(
        &self,
        total: f64,
        index: &ProximityIndex<'_>,
        candidates: &[&FuelStation],
    ) -> StopPlan {
        let rules = self.rules;
        let mut plan = StopPlan::default();
        let mut current_mileage = 0.0;
        let mut previous_stop: Option<GeoPoint> = None;

        while current_mileage < total {
            let segment_end = (current_mileage + rules.max_range_miles).min(total);

            let Some((station, found)) =
                cheapest_qualifying(index, candidates, current_mileage, segment_end, rules)
            else {
                tracing::warn!(
                    current_mileage,
                    segment_end,
                    retry_miles = rules.no_match_retry_miles,
                    "no station within range of segment"
                );
                match advance(current_mileage, rules.no_match_retry_miles) {
                    Some(next) => current_mileage = next,
                    None => break,
                }
                continue;
            };

            if let Some(previous) = previous_stop {
                let spacing = distance(previous, station.location);
                if spacing < rules.min_stop_spacing_miles {
                    tracing::warn!(
                        station_id = %station.id,
                        spacing_miles = spacing,
                        min_spacing_miles = rules.min_stop_spacing_miles,
                        retry_miles = rules.spacing_retry_miles,
                        "cheapest station too close to previous stop"
                    );
                    match advance(current_mileage, rules.spacing_retry_miles) {
                        Some(next) => current_mileage = next,
                        None => break,
                    }
                    continue;
                }
            }

            tracing::info!(
                station_id = %station.id,
                station = %station.name,
                price_per_gallon = station.price_per_gallon,
                route_mile = found.route_mile,
                segment_start = current_mileage,
                segment_end,
                "selected fuel stop"
            );
            plan.stops.push(PlannedStop {
                station: station.clone(),
                route_mile: found.route_mile,
                distance_from_route_miles: found.distance_miles,
                segment_start_mile: current_mileage,
                segment_end_mile: segment_end,
            });
            previous_stop = Some(station.location);
            match advance(current_mileage, segment_end - current_mileage) {
                Some(next) => current_mileage = next,
                None => break,
            }
        }

        plan
    }
}

/// `mileage + step`, or `None` once the step no longer moves the mileage.
fn advance(mileage: f64, step: f64) -> Option<f64> {
    let next = mileage + step;
    if next > mileage {
        Some(next)
    } else {
        tracing::warn!(mileage, step, "window increment lost to precision, ending walk");
        None
    }
}

/// Cheapest candidate qualifying for `[start, end)`; first wins on a tie.
fn cheapest_qualifying<'a>(
    index: &ProximityIndex<'_>,
    candidates: &[&'a FuelStation],
    start: f64,
    end: f64,
    rules: &PlannerRules,
) -> Option<(&'a FuelStation, ProximityMatch)> {
    let mut best: Option<(&FuelStation, ProximityMatch)> = None;
    for &station in candidates {
        let Some(found) = index.qualifies(start, end, station, rules.proximity_threshold_miles)
        else {
            continue;
        };
        let cheaper = best
            .as_ref()
            .map_or(true, |(current, _)| station.price_per_gallon < current.price_per_gallon);
        if cheaper {
            best = Some((station, found));
        }
    }
    tracing::debug!(
        segment_start = start,
        segment_end = end,
        winner = best.as_ref().map(|(s, _)| s.id.as_str()),
        "evaluated segment"
    );
    best
}

/// Plan stops with the given rules.
pub fn plan_stops(route: &Route, catalog: &StationCatalog, rules: &PlannerRules) -> Result<StopPlan> {
    RangePlanner::new(rules).plan(route, catalog)
}
