use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::core::matcher::MatchResult;
use crate::models::{Confidence, MatchMethod, SearchCriteria};

/// Aggregate counters over matcher invocations
///
/// An explicit instance rather than a process global: share it behind an
/// `Arc` where several handlers record into it, and call [`reset`](Self::reset)
/// between tests.
#[derive(Debug, Default)]
pub struct MatchTelemetry {
    inner: Mutex<MatchStats>,
}

/// Snapshot of [`MatchTelemetry`] counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub total_searches: u64,
    pub successful_searches: u64,
    pub failed_searches: u64,
    pub average_latency_ms: f64,
    pub searches_with_account_id: u64,
    pub searches_with_email: u64,
    pub method_counts: BTreeMap<MatchMethod, u64>,
    pub confidence_counts: BTreeMap<Confidence, u64>,
}

impl MatchStats {
    /// Share of searches that matched at any tier, `0.0` before the first search
    pub fn success_rate(&self) -> f64 {
        if self.total_searches == 0 {
            return 0.0;
        }
        self.successful_searches as f64 / self.total_searches as f64
    }
}

impl MatchTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one matcher invocation
    pub fn record_search(&self, criteria: &SearchCriteria, result: &MatchResult, elapsed_ms: f64) {
        let mut stats = self.lock();

        stats.total_searches += 1;
        if result.is_match() {
            stats.successful_searches += 1;
        } else {
            stats.failed_searches += 1;
        }

        // Incremental mean
        let n = stats.total_searches as f64;
        stats.average_latency_ms += (elapsed_ms - stats.average_latency_ms) / n;

        if criteria.account_id().is_some() {
            stats.searches_with_account_id += 1;
        }
        if criteria.email().is_some() {
            stats.searches_with_email += 1;
        }

        *stats.method_counts.entry(result.method).or_insert(0) += 1;
        *stats.confidence_counts.entry(result.confidence).or_insert(0) += 1;

        tracing::trace!(
            "Recorded search: method={}, confidence={}, elapsed={:.3}ms",
            result.method,
            result.confidence,
            elapsed_ms
        );
    }

    /// Current counters
    pub fn stats(&self) -> MatchStats {
        self.lock().clone()
    }

    /// Zero every counter
    pub fn reset(&self) {
        *self.lock() = MatchStats::default();
    }

    // A panic mid-update can only leave counters slightly off, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, MatchStats> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
