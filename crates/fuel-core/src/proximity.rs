//! Station-to-route proximity over mileage windows.
//!
//! A window `[start_mile, end_mile)` of the reported route distance is mapped
//! onto a contiguous run of waypoints, and every `stride`-th waypoint of that
//! run is compared against a station. Two mappings are available:
//!
//! * [`WindowStrategy::Cumulative`] scales the reported mileage onto the
//!   geometry's own cumulative length, so a window covers the waypoints that
//!   actually lie in that stretch of road.
//! * [`WindowStrategy::WaypointIndex`] treats mileage values as waypoint
//!   indices. This only lines up with real distance when decoded points are
//!   about one mile apart, and is kept for parity with older planners.

use serde::{Deserialize, Serialize};

use crate::models::{FuelStation, GeoPoint, Route};
use crate::spatial::{cumulative_distances, distance};

/// Slack for cumulative mileage sums that land just below a window bound.
const MILE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowStrategy {
    #[default]
    Cumulative,
    WaypointIndex,
}

/// Closest sampled waypoint to a station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityMatch {
    /// Great-circle distance from the station to the sample, in miles
    pub distance_miles: f64,
    /// Index of the sample within the route waypoints
    pub waypoint_index: usize,
    /// Position of the sample along the reported route distance
    pub route_mile: f64,
}

/// Minimum distance from `station` to every `stride`-th point of `window`.
///
/// Returns `None` for an empty window.
pub fn nearest_sampled_distance(
    window: &[GeoPoint],
    stride: usize,
    station: &FuelStation,
) -> Option<f64> {
    window
        .iter()
        .step_by(stride.max(1))
        .map(|point| distance(*point, station.location))
        .min_by(|a, b| a.total_cmp(b))
}

/// Mileage-window lookup over one route's waypoints.
#[derive(Debug, Clone)]
pub struct ProximityIndex<'a> {
    waypoints: &'a [GeoPoint],
    total_distance_miles: f64,
    stride: usize,
    strategy: WindowStrategy,
    // Cumulative geometry miles per waypoint, rescaled to reported miles.
    route_miles: Vec<f64>,
}

impl<'a> ProximityIndex<'a> {
    pub fn new(route: &'a Route, stride: usize, strategy: WindowStrategy) -> Self {
        let route_miles = match strategy {
            WindowStrategy::Cumulative => {
                let cumulative = cumulative_distances(&route.waypoints);
                let geometry_miles = cumulative.last().copied().unwrap_or(0.0);
                let scale = if geometry_miles > 0.0 && route.total_distance_miles > 0.0 {
                    route.total_distance_miles / geometry_miles
                } else {
                    1.0
                };
                cumulative.into_iter().map(|miles| miles * scale).collect()
            }
            WindowStrategy::WaypointIndex => (0..route.waypoints.len()).map(|i| i as f64).collect(),
        };

        Self {
            waypoints: &route.waypoints,
            total_distance_miles: route.total_distance_miles,
            stride: stride.max(1),
            strategy,
            route_miles,
        }
    }

    /// Waypoint index range covering `[start_mile, end_mile)`.
    ///
    /// The final window of the route also includes the destination point.
    pub fn window_range(&self, start_mile: f64, end_mile: f64) -> std::ops::Range<usize> {
        let len = self.waypoints.len();
        match self.strategy {
            WindowStrategy::Cumulative => {
                let start = self
                    .route_miles
                    .partition_point(|&m| m < start_mile - MILE_EPSILON);
                let end = if end_mile >= self.total_distance_miles {
                    len
                } else {
                    self.route_miles
                        .partition_point(|&m| m < end_mile - MILE_EPSILON)
                };
                start..end.max(start)
            }
            WindowStrategy::WaypointIndex => {
                let start = (start_mile.max(0.0) as usize).min(len);
                let end = (end_mile.max(0.0) as usize).min(len);
                start..end.max(start)
            }
        }
    }

    /// Closest sampled waypoint of the window to `station`.
    pub fn nearest(
        &self,
        start_mile: f64,
        end_mile: f64,
        station: &FuelStation,
    ) -> Option<ProximityMatch> {
        let range = self.window_range(start_mile, end_mile);
        range
            .step_by(self.stride)
            .map(|index| ProximityMatch {
                distance_miles: distance(self.waypoints[index], station.location),
                waypoint_index: index,
                route_mile: self.route_miles[index],
            })
            .min_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles))
    }

    /// The station's nearest sample if it lies within `threshold_miles`.
    pub fn qualifies(
        &self,
        start_mile: f64,
        end_mile: f64,
        station: &FuelStation,
        threshold_miles: f64,
    ) -> Option<ProximityMatch> {
        self.nearest(start_mile, end_mile, station)
            .filter(|found| found.distance_miles <= threshold_miles)
    }
}
