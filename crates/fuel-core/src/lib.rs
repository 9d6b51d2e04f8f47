pub mod catalog;
pub mod cost;
pub mod directions;
pub mod error;
pub mod geojson;
pub mod models;
pub mod planner;
pub mod polyline;
pub mod proximity;
pub mod rules;
pub mod spatial;
pub mod trip;

pub use catalog::{CatalogFormat, StationCatalog};
pub use cost::{estimate, FuelPricing, TripCostEstimate};
pub use directions::{DirectionsResponse, DistanceUnit};
pub use error::{PlanError, Result};
pub use geojson::{assemble, Feature, FeatureCollection, Geometry};
pub use models::{FuelStation, GeoPoint, Route, RouteInput, StationRecord};
pub use planner::{candidate_stations, plan_stops, PlannedStop, RangePlanner, StopPlan};
pub use proximity::{nearest_sampled_distance, ProximityIndex, WindowStrategy};
pub use rules::PlannerRules;
pub use spatial::haversine_distance;
pub use trip::{plan_trip, TripPlan};
