//! Parsing of already-fetched directions responses.
//!
//! Only the shape is handled here; fetching routes from a provider happens
//! outside this crate.

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::models::{GeoPoint, RouteInput};
use crate::polyline;

const METERS_PER_MILE: f64 = 1609.344;
const KILOMETERS_PER_MILE: f64 = 1.609344;

/// Unit of the distances reported by a directions provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Meters,
    Kilometers,
    Miles,
}

impl DistanceUnit {
    pub fn to_miles(self, value: f64) -> f64 {
        match self {
            DistanceUnit::Meters => value / METERS_PER_MILE,
            DistanceUnit::Kilometers => value / KILOMETERS_PER_MILE,
            DistanceUnit::Miles => value,
        }
    }
}

/// Route geometry as providers emit it: an encoded polyline or GeoJSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectionsGeometry {
    Encoded(String),
    LineString { coordinates: Vec<[f64; 2]> },
}

impl DirectionsGeometry {
    /// The geometry as an encoded polyline string.
    pub fn to_encoded(&self) -> Result<String> {
        match self {
            DirectionsGeometry::Encoded(encoded) => Ok(encoded.clone()),
            DirectionsGeometry::LineString { coordinates } => {
                let points: Vec<GeoPoint> = coordinates
                    .iter()
                    .map(|[lon, lat]| GeoPoint::new(*lat, *lon))
                    .collect();
                polyline::encode(&points)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionsSummary {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionsSegment {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub geometry: Option<DirectionsGeometry>,
    #[serde(default)]
    pub summary: Option<DirectionsSummary>,
    #[serde(default)]
    pub segments: Vec<DirectionsSegment>,
}

impl DirectionsRoute {
    /// Reported length, in the provider's unit.
    ///
    /// Segment distances are summed; the summary is used when there are none.
    pub fn reported_distance(&self) -> f64 {
        if self.segments.is_empty() {
            self.summary.as_ref().map_or(0.0, |summary| summary.distance)
        } else {
            self.segments.iter().map(|segment| segment.distance).sum()
        }
    }
}

/// A directions body with one or more alternative routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

impl DirectionsResponse {
    pub fn from_json_str(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|err| PlanError::InvalidDirections(err.to_string()))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|err| PlanError::InvalidDirections(err.to_string()))
    }

    /// Planner input for the primary route.
    pub fn route_input(&self, unit: DistanceUnit) -> Result<RouteInput> {
        let route = self.routes.first().ok_or(PlanError::EmptyGeometry)?;
        let geometry = route
            .geometry
            .as_ref()
            .map(DirectionsGeometry::to_encoded)
            .transpose()?
            .unwrap_or_default();
        Ok(RouteInput {
            geometry,
            distance_miles: unit.to_miles(route.reported_distance()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_segment_distances_in_meters() {
        let response = DirectionsResponse::from_json_str(
            r#"{"routes": [{
                "geometry": "_p~iF~ps|U_ulLnnqC",
                "summary": {"distance": 1.0, "duration": 2.0},
                "segments": [{"distance": 160934.4}, {"distance": 160934.4}]
            }]}"#,
        )
        .expect("parse");
        let input = response.route_input(DistanceUnit::Meters).expect("input");
        assert_eq!(input.geometry, "_p~iF~ps|U_ulLnnqC");
        assert!((input.distance_miles - 200.0).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_summary_distance() {
        let response = DirectionsResponse::from_json_str(
            r#"{"routes": [{"geometry": "??", "summary": {"distance": 321.8688}}]}"#,
        )
        .expect("parse");
        let input = response.route_input(DistanceUnit::Kilometers).expect("input");
        assert!((input.distance_miles - 200.0).abs() < 1e-9);
    }

    #[test]
    fn geojson_geometry_is_encoded() {
        let response = DirectionsResponse::from_json_str(
            r#"{"routes": [{
                "geometry": {"type": "LineString", "coordinates": [[-120.2, 38.5], [-120.95, 40.7]]},
                "segments": [{"distance": 10}]
            }]}"#,
        )
        .expect("parse");
        let input = response.route_input(DistanceUnit::Miles).expect("input");
        assert_eq!(input.geometry, "_p~iF~ps|U_ulLnnqC");
        assert_eq!(input.distance_miles, 10.0);
    }

    #[test]
    fn no_routes_means_no_geometry() {
        let response = DirectionsResponse::from_json_str(r#"{"routes": []}"#).expect("parse");
        assert_eq!(
            response.route_input(DistanceUnit::Meters).unwrap_err(),
            PlanError::EmptyGeometry
        );
    }

    #[test]
    fn garbage_body_is_invalid_directions() {
        let err = DirectionsResponse::from_json_str("<html>").unwrap_err();
        assert_eq!(err.kind(), "invalid_directions");
    }
}
