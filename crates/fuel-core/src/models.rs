//! Core data models for fuel stop planning.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has finite, in-range coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Coordinates in GeoJSON order.
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// A decoded route: ordered waypoints plus the externally reported length.
///
/// Range math uses `total_distance_miles`; the waypoints are only used for
/// proximity sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub waypoints: Vec<GeoPoint>,
    pub total_distance_miles: f64,
}

impl Route {
    pub fn new(waypoints: Vec<GeoPoint>, total_distance_miles: f64) -> Self {
        Self {
            waypoints,
            total_distance_miles,
        }
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.waypoints.first().copied()
    }
}

/// Route as received from the routing collaborator, before decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInput {
    /// Encoded polyline of the route
    pub geometry: String,
    /// Reported route length, already in miles
    pub distance_miles: f64,
}

impl RouteInput {
    pub fn new(geometry: impl Into<String>, distance_miles: f64) -> Self {
        Self {
            geometry: geometry.into(),
            distance_miles,
        }
    }

    /// Decode the geometry into a [`Route`].
    pub fn decode(&self) -> crate::error::Result<Route> {
        let encoded = self.geometry.trim();
        if encoded.is_empty() {
            return Err(crate::error::PlanError::EmptyGeometry);
        }
        let waypoints = crate::polyline::decode(encoded)?;
        Ok(Route::new(waypoints, self.distance_miles))
    }
}

/// A validated, priced fuel station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelStation {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub location: GeoPoint,
    pub price_per_gallon: f64,
}

/// A station as supplied by the catalog source.
///
/// Any of coordinates or price may be missing; such records are excluded from
/// planning rather than treated as errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    #[serde(default, deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lon", alias = "lng")]
    pub longitude: Option<f64>,
    #[serde(default, alias = "price", alias = "retail_price")]
    pub price_per_gallon: Option<f64>,
}

impl StationRecord {
    /// Convert into a [`FuelStation`] if coordinates and price are usable.
    pub fn to_station(&self) -> Option<FuelStation> {
        let location = GeoPoint::new(self.latitude?, self.longitude?);
        let price = self.price_per_gallon?;
        if !location.is_valid() || !price.is_finite() || price <= 0.0 {
            return None;
        }
        Some(FuelStation {
            id: self.id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            location,
            price_per_gallon: price,
        })
    }
}

impl From<&FuelStation> for StationRecord {
    fn from(station: &FuelStation) -> Self {
        Self {
            id: station.id.clone(),
            name: station.name.clone(),
            address: station.address.clone(),
            city: station.city.clone(),
            state: station.state.clone(),
            latitude: Some(station.location.latitude),
            longitude: Some(station.location.longitude),
            price_per_gallon: Some(station.price_per_gallon),
        }
    }
}

// Station stores hand out numeric primary keys as often as string ids.
fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
