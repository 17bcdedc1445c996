//! Resolution pipeline: ordered strategies, provenance, manual fallback.
//!
//! Strategies run strictly sequentially (the surfaces they hit are
//! rate-limited; parallelism buys nothing once the first success
//! short-circuits). The pipeline holds no shared mutable state, so
//! independent resolutions may run concurrently. There is no built-in
//! overall deadline — callers compose one externally.

use std::time::{Duration, Instant};

use chrono::Utc;
use placeid_core::{BusinessRecord, Coordinates, ResolverConfig};

use crate::error::ResolverError;
use crate::retry::with_retry;
use crate::strategies::coordinate::{
    CoordinateLookup, COORDINATE_DESCRIPTION, COORDINATE_STRATEGY_NAME, COORDINATE_SUCCESS_RATE,
};
use crate::strategies::{strip_markup, AggregatedSearchApi, PlaceStrategy, TextSearchLookup};
use crate::types::{
    Candidate, ResolutionMethod, ResolutionResult, StepRecord, StrategyStatus,
};

/// Orchestrates place-id resolution for one business record at a time.
///
/// Try-order is reliability-based and fixed at construction; it is
/// independent of the per-strategy confidence constants.
pub struct PlaceResolver {
    strategies: Vec<Box<dyn PlaceStrategy>>,
    coordinate: CoordinateLookup,
    place_base_url: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl PlaceResolver {
    /// Creates a resolver with the production strategy order: text search,
    /// then the aggregated search API.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Http`] if an underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &ResolverConfig) -> Result<Self, ResolverError> {
        let strategies: Vec<Box<dyn PlaceStrategy>> = vec![
            Box::new(TextSearchLookup::new(config)?),
            Box::new(AggregatedSearchApi::new(config)?),
        ];
        Self::with_strategies(config, strategies)
    }

    /// Creates a resolver with a caller-supplied strategy list. The pipeline
    /// stays strategy-agnostic, so instrumented or reordered strategies plug
    /// in without touching orchestration.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Http`] if the coordinate-lookup HTTP client
    /// cannot be constructed.
    pub fn with_strategies(
        config: &ResolverConfig,
        strategies: Vec<Box<dyn PlaceStrategy>>,
    ) -> Result<Self, ResolverError> {
        Ok(Self {
            strategies,
            coordinate: CoordinateLookup::new(config)?,
            place_base_url: config.place_base_url.clone(),
            max_attempts: config.max_attempts,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// Resolves a place id for `target`, trying each strategy in order under
    /// the retry wrapper and degrading to the manual-fallback result when
    /// every strategy is exhausted.
    ///
    /// Every code path terminates in a well-formed [`ResolutionResult`]; the
    /// single hard failure is a record whose name is empty after markup
    /// stripping, rejected before any strategy runs.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::MissingName`] for a nameless record.
    pub async fn resolve(
        &self,
        target: &BusinessRecord,
    ) -> Result<ResolutionResult, ResolverError> {
        let name = strip_markup(&target.name);
        if name.is_empty() {
            return Err(ResolverError::MissingName);
        }

        let started = Instant::now();
        let mut steps: Vec<StepRecord> = Vec::with_capacity(self.strategies.len() + 1);

        for (index, strategy) in self.strategies.iter().enumerate() {
            let step = ordinal(index);
            tracing::info!(
                strategy = strategy.name(),
                step,
                name = %name,
                "trying resolution strategy"
            );

            let outcome = with_retry(strategy.name(), self.max_attempts, self.retry_delay, || {
                strategy.attempt(target)
            })
            .await;

            match outcome {
                Some(candidate) => {
                    steps.push(StepRecord {
                        step,
                        strategy: strategy.name().to_owned(),
                        succeeded: true,
                        place_id: Some(candidate.place_id.clone()),
                        error: None,
                        manual_instructions: None,
                    });
                    tracing::info!(
                        strategy = strategy.name(),
                        place_id = %candidate.place_id,
                        "resolution succeeded"
                    );
                    return Ok(self.success_result(strategy.method(), &candidate, steps, started));
                }
                None => steps.push(StepRecord {
                    step,
                    strategy: strategy.name().to_owned(),
                    succeeded: false,
                    place_id: None,
                    error: Some(format!("no result after {} attempts", self.max_attempts)),
                    manual_instructions: None,
                }),
            }
        }

        let instructions = manual_instructions(&name, target.address.as_deref());
        steps.push(StepRecord {
            step: ordinal(self.strategies.len()),
            strategy: "manual".to_owned(),
            succeeded: true,
            place_id: None,
            error: None,
            manual_instructions: Some(instructions),
        });
        tracing::info!(name = %name, "all strategies exhausted; returning manual-fallback result");

        Ok(ResolutionResult {
            place_id: None,
            place_url: None,
            review_url: None,
            method: ResolutionMethod::Manual,
            // The manual path always succeeds at providing actionable next
            // steps, so it carries full confidence in itself.
            confidence: 1.0,
            steps,
            duration_ms: elapsed_ms(started),
            timestamp: Utc::now(),
        })
    }

    /// Coordinate-keyed lookup, outside the state machine. Always yields a
    /// candidate; a synthetic one when the map surface resolves nothing.
    pub async fn resolve_by_coordinates(
        &self,
        coords: Coordinates,
        name_hint: Option<&str>,
    ) -> Candidate {
        self.coordinate.attempt(coords, name_hint).await
    }

    /// Static per-strategy reliability snapshot for the operational
    /// dashboard. Success rates are configured priors, not measured rates.
    #[must_use]
    pub fn strategy_status(&self) -> Vec<StrategyStatus> {
        let mut statuses: Vec<StrategyStatus> = self
            .strategies
            .iter()
            .map(|strategy| StrategyStatus {
                name: strategy.name().to_owned(),
                success_rate: strategy.success_rate(),
                description: strategy.description().to_owned(),
            })
            .collect();
        statuses.push(StrategyStatus {
            name: COORDINATE_STRATEGY_NAME.to_owned(),
            success_rate: COORDINATE_SUCCESS_RATE,
            description: COORDINATE_DESCRIPTION.to_owned(),
        });
        statuses
    }

    fn success_result(
        &self,
        method: ResolutionMethod,
        candidate: &Candidate,
        steps: Vec<StepRecord>,
        started: Instant,
    ) -> ResolutionResult {
        let id = &candidate.place_id;
        ResolutionResult {
            place_id: Some(id.clone()),
            place_url: Some(format!("{}/{id}/home", self.place_base_url)),
            review_url: Some(format!("{}/{id}/review", self.place_base_url)),
            method,
            confidence: candidate.confidence,
            steps,
            duration_ms: elapsed_ms(started),
            timestamp: Utc::now(),
        }
    }
}

fn ordinal(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn manual_instructions(name: &str, address: Option<&str>) -> String {
    let location = address.unwrap_or("address unknown");
    format!(
        "Automated resolution failed for \"{name}\" ({location}). \
         Search for the business on the map service, open the matching place \
         page, and copy the numeric id from the page URL."
    )
}
