//! Candidate scoring against a target business record.
//!
//! Pure string comparison, no I/O. Both checks must hold for a candidate to
//! match: name containment (either direction, case-insensitive, punctuation
//! stripped) and address token overlap. The first matching candidate in input
//! order wins; there is no global best-score ranking, so ties fall to the
//! strategy's own ordering.

use placeid_core::BusinessRecord;

use crate::types::Candidate;

/// Returns the first candidate that matches the target on both name and
/// address, or `None` when no candidate satisfies both checks.
#[must_use]
pub fn find_match<'a>(
    candidates: &'a [Candidate],
    target: &BusinessRecord,
) -> Option<&'a Candidate> {
    let target_name = normalize_name(&target.name);
    let address_tokens = address_tokens(target.address.as_deref());

    candidates.iter().find(|candidate| {
        names_overlap(&normalize_name(&candidate.display_name), &target_name)
            && address_overlaps(candidate, &address_tokens)
    })
}

/// Lower-cases and strips punctuation, keeping letters, digits, and spaces.
/// Whitespace runs collapse to a single space so containment checks are not
/// defeated by stripped punctuation leaving double spaces behind.
fn normalize_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn names_overlap(candidate: &str, target: &str) -> bool {
    if candidate.is_empty() || target.is_empty() {
        return false;
    }
    candidate.contains(target) || target.contains(candidate)
}

/// Whitespace tokens of the target address longer than one char. Single-char
/// tokens (lot numbers, dashes) match far too loosely to be evidence.
fn address_tokens(address: Option<&str>) -> Vec<String> {
    address
        .unwrap_or_default()
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .map(str::to_owned)
        .collect()
}

fn address_overlaps(candidate: &Candidate, tokens: &[String]) -> bool {
    if tokens.is_empty() {
        return false;
    }
    let fields = [candidate.address.as_deref(), candidate.road_address.as_deref()];
    tokens.iter().any(|token| {
        fields
            .iter()
            .flatten()
            .any(|field| field.contains(token.as_str()))
    })
}
