//! GeoJSON projection of a planned trip.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::models::GeoPoint;
use crate::planner::StopPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionKind {
    FeatureCollection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    Feature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    LineString { coordinates: Vec<[f64; 2]> },
    Point { coordinates: [f64; 2] },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionKind,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Point features, in stop order.
    pub fn stop_features(&self) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .filter(|feature| matches!(feature.geometry, Geometry::Point { .. }))
    }
}

fn properties(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Build the map payload: the route line first, then one point per stop.
///
/// `total_fuel_cost` is reported as given, so pass the rounded figure.
pub fn assemble(
    waypoints: &[GeoPoint],
    plan: &StopPlan,
    total_fuel_cost: f64,
    total_distance_miles: f64,
) -> FeatureCollection {
    let mut features = Vec::with_capacity(plan.len() + 1);

    features.push(Feature {
        kind: FeatureKind::Feature,
        geometry: Geometry::LineString {
            coordinates: waypoints.iter().map(GeoPoint::lon_lat).collect(),
        },
        properties: properties(json!({
            "total_fuel_cost": total_fuel_cost,
            "total_distance_miles": total_distance_miles,
        })),
    });

    for (stop_index, stop) in plan.stops.iter().enumerate() {
        let station = &stop.station;
        features.push(Feature {
            kind: FeatureKind::Feature,
            geometry: Geometry::Point {
                coordinates: station.location.lon_lat(),
            },
            properties: properties(json!({
                "id": station.id,
                "stop_index": stop_index,
                "name": station.name,
                "price": station.price_per_gallon,
                "address": station.address,
                "city": station.city,
                "state": station.state,
                "route_mile": stop.route_mile,
            })),
        });
    }

    FeatureCollection {
        kind: CollectionKind::FeatureCollection,
        features,
    }
}
