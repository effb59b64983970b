// Core algorithm exports
pub mod matcher;
pub mod normalize;
pub mod similarity;
pub mod telemetry;

pub use matcher::{RequestMatcher, MatchResult, ACCOUNT_ID_FUZZY_THRESHOLD, EMAIL_FUZZY_THRESHOLD};
pub use normalize::{normalize_string, normalize_email, extract_email_username, fuzzy_match};
pub use similarity::{levenshtein_distance, similarity};
pub use telemetry::{MatchTelemetry, MatchStats};
