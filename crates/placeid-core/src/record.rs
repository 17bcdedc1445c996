//! Domain input types for place-identity resolution.

use serde::{Deserialize, Serialize};

/// A geographic coordinate pair as supplied by upstream search results.
///
/// `x` is the longitude-like axis and `y` the latitude-like axis, matching
/// the order the map surface uses in its query strings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

/// A loosely-specified business record to resolve a place ID for.
///
/// Assembled by an upstream caller from a prior candidate search; the
/// resolver treats it as read-only. `name` may contain search-result markup
/// (`<b>…</b>` highlighting) which strategies strip before use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRecord {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub road_address: Option<String>,
    /// Region fragment ("구"/district level) used to narrow query variants.
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl BusinessRecord {
    /// Convenience constructor for the common name-plus-address case.
    #[must_use]
    pub fn new(name: impl Into<String>, address: Option<String>) -> Self {
        Self {
            name: name.into(),
            address,
            road_address: None,
            district: None,
            coordinates: None,
        }
    }
}
