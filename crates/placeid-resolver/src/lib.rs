//! Place-identity resolution.
//!
//! Given a loosely-specified business record (name, address, optional
//! coordinates), determine a stable external place id by trying independent
//! acquisition strategies in a fixed priority order, each behind a bounded
//! fixed-delay retry, degrading to a deterministic manual-fallback result
//! with structured per-step provenance.

pub mod error;
mod fetch;
pub mod matcher;
pub mod pipeline;
pub mod retry;
pub mod strategies;
pub mod types;

pub use error::ResolverError;
pub use matcher::find_match;
pub use pipeline::PlaceResolver;
pub use retry::with_retry;
pub use strategies::{AggregatedSearchApi, CoordinateLookup, PlaceStrategy, TextSearchLookup};
pub use types::{
    Candidate, ResolutionMethod, ResolutionResult, SourceStrategy, StepRecord, StrategyStatus,
};
