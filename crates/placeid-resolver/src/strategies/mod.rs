//! Place-id acquisition strategies.
//!
//! Each strategy is one self-contained way of turning a business record into
//! a candidate place id. The pipeline tries them in priority order behind
//! [`PlaceStrategy`] and short-circuits on the first success. Strategies
//! never raise fatal errors: network and parse failures are logged and
//! surfaced as an absent result so the retry wrapper can decide what to do.

mod aggregated;
pub(crate) mod coordinate;
mod text_search;

pub use aggregated::AggregatedSearchApi;
pub use coordinate::CoordinateLookup;
pub use text_search::TextSearchLookup;

use async_trait::async_trait;
use placeid_core::BusinessRecord;
use regex::Regex;

use crate::types::{Candidate, ResolutionMethod};

/// Minimum digits for a structurally valid place id. Shorter numeric strings
/// show up constantly in page markup (pixel sizes, list indices) and are
/// never real ids in this directory.
pub(crate) const MIN_PLACE_ID_LEN: usize = 4;

/// The identifier-in-path pattern shared by every surface we scrape.
pub(crate) const PLACE_ID_PATTERN: &str = r"place/(\d+)";

/// One ordered, retryable way of resolving a place id.
#[async_trait]
pub trait PlaceStrategy: Send + Sync {
    /// Stable strategy name used in step records and logs.
    fn name(&self) -> &'static str;

    /// The method tag stamped on a winning resolution.
    fn method(&self) -> ResolutionMethod;

    /// Configured success-rate prior for the status snapshot.
    fn success_rate(&self) -> f64;

    /// Human-readable description for the status snapshot.
    fn description(&self) -> &'static str;

    /// One attempt at resolution. Absent means "nothing found or a transient
    /// failure"; the caller owns retries.
    async fn attempt(&self, target: &BusinessRecord) -> Option<Candidate>;
}

/// Strips search-result markup (`<b>…</b>` highlighting and friends) from a
/// business name.
pub(crate) fn strip_markup(name: &str) -> String {
    let re = Regex::new(r"<[^>]*>").expect("valid regex");
    re.replace_all(name, "").trim().to_string()
}

/// Structural validity check for an extracted id: numeric, 4+ digits.
/// Failing this is not a network failure, just a discarded scan hit.
pub(crate) fn is_valid_place_id(id: &str) -> bool {
    id.len() >= MIN_PLACE_ID_LEN && id.bytes().all(|b| b.is_ascii_digit())
}
