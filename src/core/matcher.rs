use serde::Serialize;
use std::time::Instant;

use crate::models::{Confidence, MatchMethod, MemberRef, SearchCriteria, StoredRequest, TraceStep};
use crate::core::{
    normalize::{extract_email_username, fuzzy_match, normalize_email, normalize_string},
    telemetry::MatchTelemetry,
};

/// Minimum similarity for the account-id fuzzy tier
pub const ACCOUNT_ID_FUZZY_THRESHOLD: f64 = 0.8;

/// Minimum similarity for the email fuzzy tier
pub const EMAIL_FUZZY_THRESHOLD: f64 = 0.7;

/// Tiers in the order they are tried; `NoMatch` closes the cascade.
const CASCADE: [MatchMethod; 5] = [
    MatchMethod::AccountIdExact,
    MatchMethod::EmailExact,
    MatchMethod::EmailUsername,
    MatchMethod::AccountIdFuzzy,
    MatchMethod::EmailFuzzy,
];

/// Result of resolving a caller against stored requests
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub requests: Vec<StoredRequest>,
    pub method: MatchMethod,
    pub confidence: Confidence,
    pub trace: Vec<TraceStep>,
    pub total_candidates: usize,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        self.method != MatchMethod::NoMatch
    }
}

/// Normalized forms of the caller's identifiers, computed once per lookup
struct Queries {
    account_id: Option<String>,
    email: Option<String>,
    email_username: Option<String>,
}

impl Queries {
    fn from_criteria(criteria: &SearchCriteria) -> Self {
        Self {
            account_id: criteria.account_id().map(normalize_string),
            email: criteria.email().map(normalize_email),
            email_username: criteria.email().and_then(extract_email_username),
        }
    }

    /// Query value for a tier, `None` when the tier is skipped
    fn for_method(&self, method: MatchMethod) -> Option<&str> {
        match method {
            MatchMethod::AccountIdExact | MatchMethod::AccountIdFuzzy => self.account_id.as_deref(),
            MatchMethod::EmailExact | MatchMethod::EmailFuzzy => self.email.as_deref(),
            MatchMethod::EmailUsername => self.email_username.as_deref(),
            MatchMethod::NoMatch => None,
        }
    }
}

/// Tiered request matcher
///
/// # Cascade
/// 1. Account id, exact
/// 2. Email, exact
/// 3. Email local part, both sides email-shaped
/// 4. Account id, fuzzy (>= 0.8)
/// 5. Email, fuzzy (>= 0.7)
/// 6. No match
///
/// The first tier with any hit wins. Every tier that actually runs is
/// recorded in the trace, so a trace never holds more than six steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestMatcher;

impl RequestMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `criteria` against a snapshot of stored requests
    ///
    /// Never fails: missing identifiers and empty snapshots produce a
    /// `no-match` result.
    pub fn find_requests(
        &self,
        criteria: &SearchCriteria,
        requests: &[StoredRequest],
    ) -> MatchResult {
        let total_candidates = requests.len();
        let queries = Queries::from_criteria(criteria);
        let members: Vec<MemberRef> = requests.iter().map(StoredRequest::member_ref).collect();
        let mut trace = Vec::with_capacity(CASCADE.len() + 1);

        for (position, method) in CASCADE.into_iter().enumerate() {
            let Some(query) = queries.for_method(method) else {
                continue;
            };

            let mut candidates = Vec::new();
            let mut hits = Vec::new();

            for (request, member) in requests.iter().zip(&members) {
                if method == MatchMethod::EmailUsername && !member.is_email() {
                    continue;
                }
                candidates.push(request.member_id.clone());
                if tier_hits(method, member, query) {
                    hits.push(request.clone());
                }
            }

            tracing::debug!(
                "Tier {} ({}) for query {:?}: {} of {} candidates matched",
                position + 1,
                method,
                query,
                hits.len(),
                candidates.len()
            );

            trace.push(TraceStep {
                step: position as u8 + 1,
                method,
                query: Some(query.to_string()),
                candidates,
                matches: hits.len(),
            });

            if !hits.is_empty() {
                return MatchResult {
                    requests: hits,
                    method,
                    confidence: method.confidence(),
                    trace,
                    total_candidates,
                };
            }
        }

        trace.push(TraceStep {
            step: CASCADE.len() as u8 + 1,
            method: MatchMethod::NoMatch,
            query: None,
            candidates: Vec::new(),
            matches: 0,
        });

        MatchResult {
            requests: Vec::new(),
            method: MatchMethod::NoMatch,
            confidence: Confidence::None,
            trace,
            total_candidates,
        }
    }

    /// Run [`find_requests`](Self::find_requests) and record it into `telemetry`
    pub fn find_requests_recorded(
        &self,
        criteria: &SearchCriteria,
        requests: &[StoredRequest],
        telemetry: &MatchTelemetry,
    ) -> MatchResult {
        let started = Instant::now();
        let result = self.find_requests(criteria, requests);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        telemetry.record_search(criteria, &result, elapsed_ms);
        result
    }
}

#[inline]
fn tier_hits(method: MatchMethod, member: &MemberRef, query: &str) -> bool {
    match method {
        MatchMethod::AccountIdExact | MatchMethod::EmailExact => member.normalized() == query,
        MatchMethod::EmailUsername => member.username() == Some(query),
        MatchMethod::AccountIdFuzzy => {
            fuzzy_match(member.normalized(), query, ACCOUNT_ID_FUZZY_THRESHOLD)
        }
        MatchMethod::EmailFuzzy => fuzzy_match(member.normalized(), query, EMAIL_FUZZY_THRESHOLD),
        MatchMethod::NoMatch => false,
    }
}
