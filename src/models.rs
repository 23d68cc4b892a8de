//! Destination records and validation of raw model output
//!
//! The model returns arbitrarily shaped JSON; validation is a single total
//! mapping into the fixed wire shape rather than type checks scattered
//! through call sites. It never fails: missing or malformed fields fall
//! back to defaults, out-of-range coordinates are dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fallback for a missing or empty `name`/`country`
pub const UNKNOWN: &str = "Unknown";
/// Fallback for a missing or empty `description`
pub const NO_DESCRIPTION: &str = "No description available";

/// A sanitized travel recommendation as served to the browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    /// Unique within one response; positional when the model omits it
    pub id: String,
    pub name: String,
    pub country: String,
    pub description: String,
    /// Latitude in [-90, 90]; present only together with `lng`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Longitude in [-180, 180]; present only together with `lat`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl Destination {
    /// Builds a well-formed destination from whatever the model produced.
    ///
    /// `index` is the element's zero-based position in the array and backs
    /// the positional `id` fallback. Coordinates must be JSON numbers in
    /// range; if either one is invalid the pair is dropped, a lone
    /// coordinate cannot be placed on the map.
    #[must_use]
    pub fn from_raw(raw: &Value, index: usize) -> Self {
        let id = match raw.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => (index + 1).to_string(),
        };

        let lat = numeric_field(raw, "lat").filter(|v| (-90.0..=90.0).contains(v));
        let lng = numeric_field(raw, "lng").filter(|v| (-180.0..=180.0).contains(v));
        let (lat, lng) = match (lat, lng) {
            (Some(lat), Some(lng)) => (Some(lat), Some(lng)),
            _ => (None, None),
        };

        Self {
            id,
            name: string_field(raw, "name").unwrap_or_else(|| UNKNOWN.to_string()),
            country: string_field(raw, "country").unwrap_or_else(|| UNKNOWN.to_string()),
            description: string_field(raw, "description")
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            lat,
            lng,
        }
    }
}

/// Validates every element of a parsed array, preserving order.
#[must_use]
pub fn sanitize_all(values: &[Value]) -> Vec<Destination> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| Destination::from_raw(value, index))
        .collect()
}

fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn numeric_field(raw: &Value, key: &str) -> Option<f64> {
    raw.get(key).and_then(Value::as_f64)
}
