//! Coordinate-based lookup with a synthetic fallback.
//!
//! The only strategy that never comes back empty-handed: if the map surface
//! yields no real id for the coordinate pair (even after a name-scoped
//! retry), it synthesizes a non-authoritative `x_y` placeholder. Callers
//! must treat a synthetic id as a weak marker, never as a resolved place.
//! This strategy is not part of the pipeline's state machine; it is exposed
//! as its own operation for records that carry coordinates.

use std::time::Duration;

use placeid_core::{Coordinates, ResolverConfig};
use regex::Regex;

use crate::error::ResolverError;
use crate::fetch::{build_url, fetch_text};
use crate::strategies::{is_valid_place_id, PLACE_ID_PATTERN};
use crate::types::{Candidate, SourceStrategy};

pub(crate) const COORDINATE_CONFIDENCE: f64 = 0.6;
pub(crate) const SYNTHETIC_CONFIDENCE: f64 = 0.1;
pub(crate) const COORDINATE_SUCCESS_RATE: f64 = 0.50;
pub(crate) const COORDINATE_STRATEGY_NAME: &str = "coordinate";
pub(crate) const COORDINATE_DESCRIPTION: &str =
    "Resolves the map location at a coordinate pair, falling back to a synthetic coordinate id";

pub struct CoordinateLookup {
    client: reqwest::Client,
    map_base_url: String,
    id_pattern: Regex,
}

impl CoordinateLookup {
    /// Creates the strategy with its own configured HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &ResolverConfig) -> Result<Self, ResolverError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            map_base_url: config.map_base_url.clone(),
            id_pattern: Regex::new(PLACE_ID_PATTERN).expect("valid regex"),
        })
    }

    /// Attempts a coordinate-keyed lookup. Always returns a candidate:
    /// an authoritative one when the map surface resolves a real id, or the
    /// synthetic `x_y` placeholder when it does not.
    pub async fn attempt(&self, coords: Coordinates, name_hint: Option<&str>) -> Candidate {
        if let Some(place_id) = self.centered_lookup(coords).await {
            return self.authoritative(place_id, coords, name_hint);
        }

        if let Some(hint) = name_hint.map(str::trim).filter(|h| !h.is_empty()) {
            tracing::debug!(hint, "map centering found no id; retrying with name-scoped search");
            if let Some(place_id) = self.name_scoped_lookup(coords, hint).await {
                return self.authoritative(place_id, coords, name_hint);
            }
        }

        let place_id = synthetic_coordinate_id(coords);
        tracing::warn!(
            place_id,
            "no real id found at coordinates; issuing synthetic placeholder"
        );
        Candidate {
            place_id,
            display_name: display_name(coords, name_hint),
            address: None,
            road_address: None,
            confidence: SYNTHETIC_CONFIDENCE,
            source: SourceStrategy::Coordinate,
            authoritative: false,
        }
    }

    fn authoritative(
        &self,
        place_id: String,
        coords: Coordinates,
        name_hint: Option<&str>,
    ) -> Candidate {
        tracing::debug!(place_id, "coordinate lookup resolved a real id");
        Candidate {
            place_id,
            display_name: display_name(coords, name_hint),
            address: None,
            road_address: None,
            confidence: COORDINATE_CONFIDENCE,
            source: SourceStrategy::Coordinate,
            authoritative: true,
        }
    }

    /// Map-centering request keyed on the coordinate pair alone.
    async fn centered_lookup(&self, coords: Coordinates) -> Option<String> {
        let center = format!("{},{},15z", coords.x, coords.y);
        let url = self.lookup_url("p", &[("c", &center)])?;
        self.extract_id_from(&url).await
    }

    /// Name-scoped search still centered on the coordinates.
    async fn name_scoped_lookup(&self, coords: Coordinates, hint: &str) -> Option<String> {
        let center = format!("{},{},15z", coords.x, coords.y);
        let url = self.lookup_url("p/search", &[("query", hint), ("c", &center)])?;
        self.extract_id_from(&url).await
    }

    fn lookup_url(&self, path: &str, query: &[(&str, &str)]) -> Option<String> {
        match build_url(&self.map_base_url, path, query) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, "could not build map lookup URL");
                None
            }
        }
    }

    async fn extract_id_from(&self, url: &str) -> Option<String> {
        let body = match fetch_text(&self.client, url, &[]).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "map lookup request failed");
                return None;
            }
        };
        self.id_pattern
            .captures_iter(&body)
            .filter_map(|captures| captures.get(1).map(|m| m.as_str()))
            .find(|id| is_valid_place_id(id))
            .map(str::to_owned)
    }
}

/// The non-authoritative fallback id: the two coordinate values joined with
/// an underscore, e.g. `127.123_37.456`.
fn synthetic_coordinate_id(coords: Coordinates) -> String {
    format!("{}_{}", coords.x, coords.y)
}

fn display_name(coords: Coordinates, name_hint: Option<&str>) -> String {
    name_hint
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{},{}", coords.x, coords.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_id_joins_coordinates_with_underscore() {
        let id = synthetic_coordinate_id(Coordinates {
            x: 127.123,
            y: 37.456,
        });
        assert_eq!(id, "127.123_37.456");
    }

    #[test]
    fn synthetic_id_preserves_integral_coordinates() {
        let id = synthetic_coordinate_id(Coordinates { x: 127.0, y: 37.0 });
        assert_eq!(id, "127_37");
    }

    #[test]
    fn display_name_prefers_the_hint() {
        let coords = Coordinates {
            x: 127.123,
            y: 37.456,
        };
        assert_eq!(display_name(coords, Some("Cafe Bloom")), "Cafe Bloom");
        assert_eq!(display_name(coords, None), "127.123,37.456");
    }
}
