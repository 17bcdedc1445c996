//! Provenance and result types for place-identity resolution.
//!
//! Everything here is ephemeral: created inside one `resolve` call and handed
//! back to the caller. Persistence, if any, belongs to collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which acquisition strategy produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceStrategy {
    TextSearch,
    AggregatedApi,
    Coordinate,
}

impl std::fmt::Display for SourceStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceStrategy::TextSearch => write!(f, "text-search"),
            SourceStrategy::AggregatedApi => write!(f, "aggregated-api"),
            SourceStrategy::Coordinate => write!(f, "coordinate"),
        }
    }
}

/// An unconfirmed place-id/business tuple returned by a strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub place_id: String,
    pub display_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub road_address: Option<String>,
    /// Strategy-assigned static prior, 0–1. Not a function of match quality.
    pub confidence: f64,
    pub source: SourceStrategy,
    /// `false` only for synthetic coordinate-derived ids, which are weak
    /// placeholders rather than resolved identifiers.
    pub authoritative: bool,
}

/// How a resolution concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMethod {
    /// Text-search scraping found and validated an id.
    Scraping,
    /// The aggregated search API produced a matcher-confirmed candidate.
    AllSearch,
    /// No automated strategy succeeded; manual instructions were issued.
    Manual,
}

impl std::fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionMethod::Scraping => write!(f, "scraping"),
            ResolutionMethod::AllSearch => write!(f, "allsearch"),
            ResolutionMethod::Manual => write!(f, "manual"),
        }
    }
}

/// One entry in the per-call provenance trail. Append-only; ordinals are
/// 1-based and strictly increasing within a call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub step: u32,
    pub strategy: String,
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Present only on the terminal manual step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_instructions: Option<String>,
}

/// Terminal output of one resolution call.
///
/// Exactly one of two shapes holds: an id with a non-manual method, or no id
/// with `method == Manual` and non-empty instructions in the last step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    #[serde(default)]
    pub place_id: Option<String>,
    /// `{place_base}/{id}/home`, derived when `place_id` is present.
    #[serde(default)]
    pub place_url: Option<String>,
    /// `{place_base}/{id}/review`, derived when `place_id` is present.
    #[serde(default)]
    pub review_url: Option<String>,
    pub method: ResolutionMethod,
    pub confidence: f64,
    pub steps: Vec<StepRecord>,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Static reliability metadata for one strategy, consumed by the operational
/// dashboard. `success_rate` is a configured prior, not a measured rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyStatus {
    pub name: String,
    pub success_rate: f64,
    pub description: String,
}
