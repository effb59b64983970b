//! FitLink Match - resolves which trainer registration requests belong to a caller
//!
//! Stored requests carry a `memberId` that is either an opaque account id or a
//! raw email address. This library resolves a caller's identifiers against
//! them with a tiered cascade (exact, username, fuzzy) that reports how
//! confident each answer is, and keeps aggregate telemetry on every lookup.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{RequestMatcher, MatchResult, MatchTelemetry, MatchStats, fuzzy_match, normalize_string};
pub use models::{StoredRequest, RequestStatus, SearchCriteria, Confidence, MatchMethod, TraceStep};
pub use services::{RequestStore, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let result = RequestMatcher::new().find_requests(&SearchCriteria::default(), &[]);
        assert_eq!(result.method, MatchMethod::NoMatch);
    }
}
