//! Encoded polyline codec.
//!
//! Routes arrive as strings in the encoded polyline algorithm format. The
//! arithmetic is done by the `polyline` crate; this module checks the chunk
//! stream first so malformed input is reported with its byte position, and
//! rejects decoded coordinates outside the valid latitude/longitude range.

use geo::LineString;

use crate::error::{PlanError, Result};
use crate::models::GeoPoint;

/// Precision of the standard format (1e-5 degrees).
pub const DEFAULT_PRECISION: u32 = 5;

const CHUNK_OFFSET: u8 = 63;
const CONTINUATION_BIT: u8 = 0x20;

/// Decode a standard (1e-5) encoded polyline.
///
/// Empty input decodes to an empty path.
pub fn decode(encoded: &str) -> Result<Vec<GeoPoint>> {
    decode_with_precision(encoded, DEFAULT_PRECISION)
}

/// Decode an encoded polyline written at `precision` decimal places.
pub fn decode_with_precision(encoded: &str, precision: u32) -> Result<Vec<GeoPoint>> {
    if encoded.is_empty() {
        return Ok(Vec::new());
    }
    check_chunks(encoded.as_bytes())?;

    let line = polyline::decode_polyline(encoded, precision)
        .map_err(|err| PlanError::malformed(0, err.to_string()))?;

    line.coords()
        .enumerate()
        .map(|(index, coord)| {
            let point = GeoPoint::new(coord.y, coord.x);
            if point.is_valid() {
                Ok(point)
            } else {
                Err(PlanError::malformed(
                    0,
                    format!(
                        "coordinate {} ({}, {}) out of range",
                        index, point.latitude, point.longitude
                    ),
                ))
            }
        })
        .collect()
}

/// Validate the chunk stream: every byte in `'?'..='~'`, no dangling
/// continuation chunk, and an even number of values.
fn check_chunks(bytes: &[u8]) -> Result<()> {
    let mut values = 0usize;
    let mut value_start = 0;
    for (position, &byte) in bytes.iter().enumerate() {
        if !(CHUNK_OFFSET..=b'~').contains(&byte) {
            return Err(PlanError::malformed(
                position,
                format!("invalid character {:?}", byte as char),
            ));
        }
        if byte - CHUNK_OFFSET < CONTINUATION_BIT {
            values += 1;
            value_start = position + 1;
        }
    }
    if value_start < bytes.len() {
        return Err(PlanError::malformed(value_start, "truncated value"));
    }
    if values % 2 != 0 {
        return Err(PlanError::malformed(bytes.len(), "latitude without longitude"));
    }
    Ok(())
}

/// Encode points as a standard (1e-5) polyline.
pub fn encode(points: &[GeoPoint]) -> Result<String> {
    encode_with_precision(points, DEFAULT_PRECISION)
}

/// Encode points at `precision` decimal places.
///
/// Fails with [`PlanError::MalformedPath`] when a point is out of range.
pub fn encode_with_precision(points: &[GeoPoint], precision: u32) -> Result<String> {
    if let Some(index) = points.iter().position(|point| !point.is_valid()) {
        return Err(PlanError::malformed(
            index,
            format!("point {} out of range", index),
        ));
    }
    let line: LineString<f64> = points
        .iter()
        .map(|point| (point.longitude, point.latitude))
        .collect();
    polyline::encode_coordinates(line, precision)
        .map_err(|err| PlanError::malformed(0, err.to_string()))
}
