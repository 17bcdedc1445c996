//! Strategy 2: structured aggregated-search API.
//!
//! Issues up to three query variants against the aggregated search endpoint
//! and hands any non-empty candidate list to the matcher. Deliberately lower
//! confidence than text search: this surface has a materially higher
//! false-negative rate in practice, so even a success is weaker evidence.

use std::time::Duration;

use async_trait::async_trait;
use placeid_core::{BusinessRecord, ResolverConfig};
use serde::Deserialize;

use crate::error::ResolverError;
use crate::fetch::{build_url, fetch_json};
use crate::matcher::find_match;
use crate::strategies::{is_valid_place_id, strip_markup, PlaceStrategy};
use crate::types::{Candidate, ResolutionMethod, SourceStrategy};

pub(crate) const ALLSEARCH_CONFIDENCE: f64 = 0.4;
pub(crate) const ALLSEARCH_SUCCESS_RATE: f64 = 0.40;

/// Envelope of the aggregated search response. Every level is optional on
/// the wire; an absent section means an empty candidate list.
#[derive(Debug, Deserialize)]
struct AllSearchResponse {
    #[serde(default)]
    result: Option<AllSearchResult>,
}

#[derive(Debug, Deserialize)]
struct AllSearchResult {
    #[serde(default)]
    place: Option<PlaceSection>,
}

#[derive(Debug, Deserialize)]
struct PlaceSection {
    #[serde(default)]
    list: Vec<PlaceItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceItem {
    id: String,
    name: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    road_address: Option<String>,
}

pub struct AggregatedSearchApi {
    client: reqwest::Client,
    allsearch_base_url: String,
}

impl AggregatedSearchApi {
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
            allsearch_base_url: config.allsearch_base_url.clone(),
        })
    }

    /// Query variants in priority order: raw name, name plus district
    /// fragment, then the road address (or lot address). Blank and duplicate
    /// variants are skipped.
    fn query_variants(target: &BusinessRecord) -> Vec<String> {
        let name = strip_markup(&target.name);
        let mut variants = vec![name.clone()];
        if let Some(district) = target.district.as_deref() {
            let district = district.trim();
            if !district.is_empty() {
                variants.push(format!("{name} {district}"));
            }
        }
        if let Some(address) = target
            .road_address
            .as_deref()
            .or(target.address.as_deref())
        {
            let address = address.trim();
            if !address.is_empty() {
                variants.push(address.to_owned());
            }
        }
        variants.retain(|v| !v.trim().is_empty());
        variants.dedup();
        variants
    }

    async fn search_variant(&self, query: &str) -> Result<Vec<Candidate>, ResolverError> {
        let url = build_url(&self.allsearch_base_url, "allSearch", &[("query", query)])?;
        let response: AllSearchResponse =
            fetch_json(&self.client, &url, &format!("allSearch(query={query})")).await?;

        let items = response
            .result
            .and_then(|r| r.place)
            .map(|section| section.list)
            .unwrap_or_default();

        Ok(items
            .into_iter()
            .filter(|item| is_valid_place_id(&item.id))
            .map(|item| Candidate {
                place_id: item.id,
                display_name: item.name,
                address: item.address,
                road_address: item.road_address,
                confidence: ALLSEARCH_CONFIDENCE,
                source: SourceStrategy::AggregatedApi,
                authoritative: true,
            })
            .collect())
    }
}

#[async_trait]
impl PlaceStrategy for AggregatedSearchApi {
    fn name(&self) -> &'static str {
        "aggregated-api"
    }

    fn method(&self) -> ResolutionMethod {
        ResolutionMethod::AllSearch
    }

    fn success_rate(&self) -> f64 {
        ALLSEARCH_SUCCESS_RATE
    }

    fn description(&self) -> &'static str {
        "Queries the aggregated search API and confirms candidates against the record via the matcher"
    }

    async fn attempt(&self, target: &BusinessRecord) -> Option<Candidate> {
        for query in Self::query_variants(target) {
            let candidates = match self.search_variant(&query).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    // Transient variant failure: skip to the next variant
                    // rather than aborting the whole attempt.
                    tracing::warn!(query, error = %e, "aggregated search variant failed");
                    continue;
                }
            };
            if candidates.is_empty() {
                tracing::debug!(query, "aggregated search variant returned no places");
                continue;
            }
            if let Some(matched) = find_match(&candidates, target) {
                tracing::debug!(
                    query,
                    place_id = matched.place_id,
                    "aggregated search produced a matcher-confirmed candidate"
                );
                return Some(matched.clone());
            }
            tracing::debug!(
                query,
                count = candidates.len(),
                "no candidate passed the matcher for this variant"
            );
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_are_name_then_district_then_address() {
        let record = BusinessRecord {
            name: "<b>Cafe Bloom</b>".to_owned(),
            address: Some("Seoul Gangnam 123".to_owned()),
            road_address: Some("Teheran-ro 1".to_owned()),
            district: Some("Gangnam-gu".to_owned()),
            coordinates: None,
        };
        assert_eq!(
            AggregatedSearchApi::query_variants(&record),
            vec![
                "Cafe Bloom".to_owned(),
                "Cafe Bloom Gangnam-gu".to_owned(),
                "Teheran-ro 1".to_owned(),
            ]
        );
    }

    #[test]
    fn lot_address_is_used_when_road_address_is_absent() {
        let record = BusinessRecord::new("Cafe Bloom", Some("Seoul Gangnam 123".to_owned()));
        assert_eq!(
            AggregatedSearchApi::query_variants(&record),
            vec!["Cafe Bloom".to_owned(), "Seoul Gangnam 123".to_owned()]
        );
    }

    #[test]
    fn name_only_record_yields_single_variant() {
        let record = BusinessRecord::new("Cafe Bloom", None);
        assert_eq!(
            AggregatedSearchApi::query_variants(&record),
            vec!["Cafe Bloom".to_owned()]
        );
    }
}
