//! Error types for fuel stop planning.

use thiserror::Error;

/// Terminal failures of a single planning call.
///
/// Degraded input (a station record missing coordinates or price, a segment
/// with no qualifying station) is never reported here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The encoded route geometry could not be decoded.
    #[error("malformed encoded path at byte {position}: {reason}")]
    MalformedPath { position: usize, reason: String },

    /// The route carries no geometry at all.
    #[error("route has no geometry")]
    EmptyGeometry,

    /// The route reports zero length although its geometry needs refueling.
    #[error("route reports {reported_miles} miles but its geometry spans {geometry_miles:.1} miles")]
    ZeroDistance {
        reported_miles: f64,
        geometry_miles: f64,
    },

    /// The reported distance is far longer than the route geometry allows.
    #[error("route reports {reported_miles} miles but its geometry spans only {geometry_miles:.1} miles")]
    DistanceMismatch {
        reported_miles: f64,
        geometry_miles: f64,
    },

    /// The catalog holds no station usable for planning.
    #[error("station catalog has no usable stations ({skipped} records skipped)")]
    InsufficientStationData { skipped: usize },

    /// Planner settings violate their documented bounds.
    #[error("invalid planner configuration: {0}")]
    InvalidConfig(String),

    /// A directions response body could not be interpreted.
    #[error("invalid directions response: {0}")]
    InvalidDirections(String),
}

impl PlanError {
    pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
        PlanError::MalformedPath {
            position,
            reason: reason.into(),
        }
    }

    /// Short machine-readable name, used for API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanError::MalformedPath { .. } => "malformed_path",
            PlanError::EmptyGeometry => "empty_geometry",
            PlanError::ZeroDistance { .. } => "zero_distance",
            PlanError::DistanceMismatch { .. } => "distance_mismatch",
            PlanError::InsufficientStationData { .. } => "insufficient_station_data",
            PlanError::InvalidConfig(_) => "invalid_config",
            PlanError::InvalidDirections(_) => "invalid_directions",
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
