//! Strategy 1: text-search scraping.
//!
//! Queries the generic text-search surface with the business name plus a
//! coarse region prefix, scans the response body for `place/<digits>` hits,
//! and confirms the first structurally valid id with a secondary fetch
//! against its detail page. Highest-confidence automated strategy.

use std::time::Duration;

use async_trait::async_trait;
use placeid_core::{BusinessRecord, ResolverConfig};
use regex::Regex;

use crate::error::ResolverError;
use crate::fetch::{build_url, fetch_text};
use crate::strategies::{is_valid_place_id, strip_markup, PlaceStrategy, PLACE_ID_PATTERN};
use crate::types::{Candidate, ResolutionMethod, SourceStrategy};

pub(crate) const TEXT_SEARCH_CONFIDENCE: f64 = 0.85;
pub(crate) const TEXT_SEARCH_SUCCESS_RATE: f64 = 0.70;

/// Identifying headers rotated per request. A small fixed pool to reduce
/// correlated blocking across consecutive lookups; not a security mechanism.
const HEADER_POOL: &[(&str, &str)] = &[
    (
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        "ko-KR,ko;q=0.9,en-US;q=0.8",
    ),
    (
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
        "ko,en;q=0.9",
    ),
    (
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        "ko-KR,ko;q=0.8,en;q=0.6",
    ),
];

pub struct TextSearchLookup {
    client: reqwest::Client,
    search_base_url: String,
    place_base_url: String,
    id_pattern: Regex,
}

impl TextSearchLookup {
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
            search_base_url: config.text_search_base_url.clone(),
            place_base_url: config.place_base_url.clone(),
            id_pattern: Regex::new(PLACE_ID_PATTERN).expect("valid regex"),
        })
    }

    /// Name (markup stripped) plus the first two whitespace tokens of the
    /// address — enough region context to disambiguate without dragging in
    /// lot-number noise.
    fn build_query(target: &BusinessRecord) -> String {
        let name = strip_markup(&target.name);
        let region = target
            .address
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .take(2)
            .collect::<Vec<_>>()
            .join(" ");
        if region.is_empty() {
            name
        } else {
            format!("{region} {name}")
        }
    }

    /// Secondary validation fetch: HTTP 200 on the detail page means the id
    /// points at a live place; anything else invalidates the scan hit.
    async fn validate_id(&self, id: &str) -> bool {
        let url = format!("{}/{id}/home", self.place_base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                tracing::debug!(id, error = %e, "validation fetch failed; treating id as invalid");
                false
            }
        }
    }

    async fn scan_and_validate(&self, body: &str) -> Option<String> {
        let mut seen: Vec<&str> = Vec::new();
        for captures in self.id_pattern.captures_iter(body) {
            let Some(id) = captures.get(1).map(|m| m.as_str()) else {
                continue;
            };
            if !is_valid_place_id(id) || seen.contains(&id) {
                continue;
            }
            seen.push(id);
            if self.validate_id(id).await {
                return Some(id.to_owned());
            }
            tracing::debug!(id, "scanned id failed validation; continuing scan");
        }
        None
    }
}

#[async_trait]
impl PlaceStrategy for TextSearchLookup {
    fn name(&self) -> &'static str {
        "text-search"
    }

    fn method(&self) -> ResolutionMethod {
        ResolutionMethod::Scraping
    }

    fn success_rate(&self) -> f64 {
        TEXT_SEARCH_SUCCESS_RATE
    }

    fn description(&self) -> &'static str {
        "Scrapes the text-search surface for place ids and validates hits against the detail page"
    }

    async fn attempt(&self, target: &BusinessRecord) -> Option<Candidate> {
        let query = Self::build_query(target);
        let url = match build_url(&self.search_base_url, "search.naver", &[("query", &query)]) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "could not build text-search URL");
                return None;
            }
        };

        let (user_agent, accept_language) = HEADER_POOL[rand::random_range(0..HEADER_POOL.len())];
        let headers = [
            ("user-agent", user_agent),
            ("accept-language", accept_language),
            ("accept", "text/html,application/xhtml+xml"),
        ];

        let body = match fetch_text(&self.client, &url, &headers).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(query, error = %e, "text-search request failed");
                return None;
            }
        };

        let place_id = self.scan_and_validate(&body).await?;
        tracing::debug!(query, place_id, "text-search resolved a validated id");
        Some(Candidate {
            place_id,
            display_name: strip_markup(&target.name),
            address: target.address.clone(),
            road_address: target.road_address.clone(),
            confidence: TEXT_SEARCH_CONFIDENCE,
            source: SourceStrategy::TextSearch,
            authoritative: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_region_prefix_plus_stripped_name() {
        let record = BusinessRecord {
            name: "<b>Cafe Bloom</b>".to_owned(),
            address: Some("Seoul Gangnam 123-45 2F".to_owned()),
            road_address: None,
            district: None,
            coordinates: None,
        };
        assert_eq!(
            TextSearchLookup::build_query(&record),
            "Seoul Gangnam Cafe Bloom"
        );
    }

    #[test]
    fn query_without_address_is_just_the_name() {
        let record = BusinessRecord::new("Cafe Bloom", None);
        assert_eq!(TextSearchLookup::build_query(&record), "Cafe Bloom");
    }
}
