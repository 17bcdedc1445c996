//! Fixed-delay bounded retry over absent-returning strategy calls.
//!
//! Strategies never surface fatal errors — a failed attempt is an absent
//! result, and every absent result short of the attempt bound is retried.
//! The delay is deliberately fixed rather than exponential: each underlying
//! call is already several seconds of network I/O, so correlated back-off
//! buys little here.

use std::future::Future;
use std::time::Duration;

/// Runs `operation` up to `max_attempts` times, sleeping `delay` after every
/// absent result except the last. Returns the first present result, or `None`
/// once the attempt budget is spent.
pub async fn with_retry<T, F, Fut>(
    strategy: &str,
    max_attempts: u32,
    delay: Duration,
    mut operation: F,
) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for attempt in 1..=max_attempts.max(1) {
        if let Some(value) = operation().await {
            tracing::debug!(strategy, attempt, "strategy produced a candidate");
            return Some(value);
        }
        if attempt < max_attempts {
            tracing::warn!(
                strategy,
                attempt,
                max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "strategy attempt came back empty — retrying after fixed delay"
            );
            tokio::time::sleep(delay).await;
        }
    }
    tracing::warn!(strategy, max_attempts, "strategy exhausted all attempts");
    None
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn returns_first_success_without_extra_calls() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = with_retry("test", 3, Duration::ZERO, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Some(42u32)
            }
        })
        .await;
        assert_eq!(result, Some(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn two_failures_then_success_makes_exactly_three_calls() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = with_retry("test", 3, Duration::ZERO, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                (attempt >= 3).then_some("candidate")
            }
        })
        .await;
        assert_eq!(result, Some("candidate"));
        assert_eq!(
            calls.load(Ordering::SeqCst),
            3,
            "2 failures + 1 success should be exactly 3 calls"
        );
    }

    #[tokio::test]
    async fn exhausts_attempt_budget_and_returns_none() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result: Option<u32> = with_retry("test", 3, Duration::ZERO, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                None
            }
        })
        .await;
        assert!(result.is_none());
        assert_eq!(
            calls.load(Ordering::SeqCst),
            3,
            "an always-absent strategy must be called exactly max_attempts times"
        );
    }

    #[tokio::test]
    async fn zero_max_attempts_still_tries_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = with_retry("test", 0, Duration::ZERO, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Some(1u32)
            }
        })
        .await;
        assert_eq!(result, Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
