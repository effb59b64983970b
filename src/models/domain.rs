use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::normalize::{extract_email_username, normalize_string};

/// Trainer-initiated registration request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRequest {
    pub id: String,
    #[serde(rename = "trainerId")]
    pub trainer_id: String,
    /// Either an opaque account id or a raw email address
    #[serde(rename = "memberId")]
    pub member_id: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl StoredRequest {
    /// Tagged, normalized view of `member_id`
    pub fn member_ref(&self) -> MemberRef {
        MemberRef::parse(&self.member_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `memberId` classified once at ingestion so matching tiers never re-sniff for `@`.
///
/// Both variants hold normalized (trimmed, lower-cased) values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberRef {
    AccountId(String),
    Email { address: String, username: String },
}

impl MemberRef {
    pub fn parse(raw: &str) -> Self {
        match extract_email_username(raw) {
            Some(username) => MemberRef::Email {
                address: normalize_string(raw),
                username,
            },
            None => MemberRef::AccountId(normalize_string(raw)),
        }
    }

    /// Normalized full value regardless of kind
    pub fn normalized(&self) -> &str {
        match self {
            MemberRef::AccountId(id) => id,
            MemberRef::Email { address, .. } => address,
        }
    }

    /// Local part, only for email-shaped values
    pub fn username(&self) -> Option<&str> {
        match self {
            MemberRef::AccountId(_) => None,
            MemberRef::Email { username, .. } => Some(username),
        }
    }

    pub fn is_email(&self) -> bool {
        matches!(self, MemberRef::Email { .. })
    }
}

/// Caller identity to resolve against stored requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(rename = "accountId", default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl SearchCriteria {
    pub fn new(account_id: Option<String>, email: Option<String>) -> Self {
        Self { account_id, email }
    }

    pub fn by_account_id(account_id: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id.into()),
            email: None,
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            account_id: None,
            email: Some(email.into()),
        }
    }

    /// Account id, or `None` when missing or blank
    pub fn account_id(&self) -> Option<&str> {
        non_blank(self.account_id.as_deref())
    }

    /// Email, or `None` when missing or blank
    pub fn email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.account_id().is_none() && self.email().is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Qualitative certainty of a match, ordered `None < Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::None => "none",
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matching strategy, in cascade order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMethod {
    AccountIdExact,
    EmailExact,
    EmailUsername,
    AccountIdFuzzy,
    EmailFuzzy,
    NoMatch,
}

impl MatchMethod {
    pub fn confidence(self) -> Confidence {
        match self {
            MatchMethod::AccountIdExact | MatchMethod::EmailExact => Confidence::High,
            MatchMethod::EmailUsername | MatchMethod::AccountIdFuzzy => Confidence::Medium,
            MatchMethod::EmailFuzzy => Confidence::Low,
            MatchMethod::NoMatch => Confidence::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchMethod::AccountIdExact => "account-id-exact",
            MatchMethod::EmailExact => "email-exact",
            MatchMethod::EmailUsername => "email-username",
            MatchMethod::AccountIdFuzzy => "account-id-fuzzy",
            MatchMethod::EmailFuzzy => "email-fuzzy",
            MatchMethod::NoMatch => "no-match",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One executed tier of the matching cascade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub step: u8,
    pub method: MatchMethod,
    /// Normalized query value the tier compared against
    pub query: Option<String>,
    /// `memberId`s the tier examined
    pub candidates: Vec<String>,
    pub matches: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_ref_parse() {
        assert_eq!(
            MemberRef::parse("  User_123 "),
            MemberRef::AccountId("user_123".to_string())
        );
        assert_eq!(
            MemberRef::parse("Foo@Bar.com"),
            MemberRef::Email {
                address: "foo@bar.com".to_string(),
                username: "foo".to_string(),
            }
        );
    }

    #[test]
    fn test_blank_criteria_fields_are_absent() {
        let criteria = SearchCriteria::new(Some("   ".to_string()), Some(String::new()));
        assert!(criteria.is_empty());
        assert_eq!(criteria.account_id(), None);
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::High > Confidence::Medium);
        assert!(Confidence::Medium > Confidence::Low);
        assert!(Confidence::Low > Confidence::None);
    }

    #[test]
    fn test_method_wire_names() {
        let json = serde_json::to_string(&MatchMethod::AccountIdExact).unwrap();
        assert_eq!(json, "\"account-id-exact\"");
        let json = serde_json::to_string(&MatchMethod::NoMatch).unwrap();
        assert_eq!(json, "\"no-match\"");
    }

    #[test]
    fn test_terminal_status() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
    }
}
