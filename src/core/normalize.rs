use crate::core::similarity::similarity;

/// Trim surrounding whitespace and lower-case
///
/// Total and idempotent; an empty input yields an empty string.
#[inline]
pub fn normalize_string(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Normalize a value that may be an email address
///
/// Email and non-email values normalize identically; the caller knows which
/// kind it passed in.
#[inline]
pub fn normalize_email(s: &str) -> String {
    normalize_string(s)
}

/// Normalized local part of an email-shaped value, `None` without an `@`
pub fn extract_email_username(s: &str) -> Option<String> {
    let normalized = normalize_string(s);
    normalized
        .split_once('@')
        .map(|(local, _domain)| local.to_string())
}

/// True when the similarity of the two normalized strings reaches `threshold`
///
/// Symmetric in `a` and `b`. Identical normalized strings always score `1.0`.
#[inline]
pub fn fuzzy_match(a: &str, b: &str, threshold: f64) -> bool {
    similarity(&normalize_string(a), &normalize_string(b)) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_string() {
        assert_eq!(normalize_string("  User_123\t"), "user_123");
        assert_eq!(normalize_string(""), "");
        assert_eq!(normalize_string("   "), "");
    }

    #[test]
    fn test_normalize_string_idempotent() {
        let once = normalize_string("  MiXeD Case ");
        assert_eq!(normalize_string(&once), once);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" Foo@Bar.COM "), "foo@bar.com");
        assert_eq!(normalize_email("NotAnEmail"), "notanemail");
    }

    #[test]
    fn test_extract_email_username() {
        assert_eq!(extract_email_username("Foo@bar.com"), Some("foo".to_string()));
        assert_eq!(extract_email_username("user_123"), None);
        assert_eq!(extract_email_username("@bar.com"), Some(String::new()));
        assert_eq!(extract_email_username(""), None);
    }

    #[test]
    fn test_fuzzy_match_thresholds() {
        // One edit out of eight characters
        assert!(fuzzy_match("usr_9999", "usr_9998", 0.8));
        assert!(!fuzzy_match("usr_9999", "abc_1234", 0.8));
    }

    #[test]
    fn test_fuzzy_match_self() {
        assert!(fuzzy_match("anything", "ANYTHING ", 1.0));
        assert!(fuzzy_match("", "", 1.0));
    }

    #[test]
    fn test_fuzzy_match_symmetric() {
        let pairs = [("jane@gym.io", "jan@gym.io"), ("abc", "abcdef"), ("", "x")];
        for (a, b) in pairs {
            for t in [0.0, 0.5, 0.7, 0.8, 1.0] {
                assert_eq!(fuzzy_match(a, b, t), fuzzy_match(b, a, t));
            }
        }
    }
}
