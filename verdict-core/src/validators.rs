// Value predicates shared by the rule catalog

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// Common regex patterns
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());

// Canonical 8-4-4-4-12 form, versions 1-5 only
static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .unwrap()
});

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALPHANUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9\s\-()]{7,20}$").unwrap());

static DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Empty for required-resolution: null, or a string whose trimmed form is
/// empty. Non-string falsy values (0, false, []) are not empty.
pub(crate) fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// The string form used by the length rules. Arrays and objects have none.
pub(crate) fn string_form(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Character count (not byte count) of the value's string form.
pub(crate) fn string_length(value: &Value) -> Option<usize> {
    string_form(value).map(|s| s.chars().count())
}

/// Numbers, or strings whose trimmed form parses as a finite number.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Real booleans, integer 0/1, or the strings "true"/"false"/"0"/"1"
/// (case-insensitive).
pub(crate) fn as_boolean_like(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Loose (coercing) equality for `RequiredIf` triggers: strict equality,
/// numeric equality across numbers and numeric strings, or boolean-like
/// equivalence.
pub(crate) fn loose_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (as_boolean_like(a), as_boolean_like(b)) {
        return x == y;
    }
    false
}

pub(crate) fn is_email(value: &Value) -> bool {
    value.as_str().is_some_and(|s| EMAIL_REGEX.is_match(s))
}

pub(crate) fn is_url(value: &Value) -> bool {
    value.as_str().is_some_and(|s| URL_REGEX.is_match(s))
}

pub(crate) fn is_uuid(value: &Value) -> bool {
    value.as_str().is_some_and(|s| UUID_REGEX.is_match(s))
}

pub(crate) fn is_alpha(value: &Value) -> bool {
    value.as_str().is_some_and(|s| ALPHA_REGEX.is_match(s))
}

pub(crate) fn is_alpha_num(value: &Value) -> bool {
    value.as_str().is_some_and(|s| ALPHANUMERIC_REGEX.is_match(s))
}

pub(crate) fn is_phone(value: &Value) -> bool {
    value.as_str().is_some_and(|s| PHONE_REGEX.is_match(s))
}

pub(crate) fn is_lowercase(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s == s.to_lowercase())
}

pub(crate) fn is_uppercase(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s == s.to_uppercase())
}

pub(crate) fn is_ip(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.parse::<std::net::IpAddr>().is_ok())
}

/// Permissive date check over the common interchange layouts.
pub(crate) fn is_date(value: &Value) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    let s = s.trim();

    if DateTime::parse_from_rfc3339(s).is_ok() || DateTime::parse_from_rfc2822(s).is_ok() {
        return true;
    }

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    if DATETIME_FORMATS
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
    {
        return true;
    }

    const DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d-%m-%Y",
        "%d/%m/%Y",
        "%d %B %Y",
        "%B %d, %Y",
    ];
    DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(s, fmt).is_ok())
}

/// Integers or digit-only strings representable as a Unix epoch second count.
pub(crate) fn is_timestamp(value: &Value) -> bool {
    let seconds = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) if DIGITS_REGEX.is_match(s) => s.parse::<i64>().ok(),
        _ => None,
    };
    seconds.is_some_and(|s| DateTime::from_timestamp(s, 0).is_some())
}

pub(crate) fn is_json(value: &Value) -> bool {
    match value {
        Value::Array(_) | Value::Object(_) => true,
        Value::String(s) => serde_json::from_str::<Value>(s).is_ok(),
        _ => false,
    }
}

/// Every character must be a letter or a member of `characters`, and the
/// members of `characters` may occur at most `limit` times in total.
pub(crate) fn allowed_characters(value: &Value, characters: &str, limit: Option<usize>) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    let mut allowed_seen = 0usize;
    for c in s.chars() {
        if characters.contains(c) {
            allowed_seen += 1;
        } else if !c.is_alphabetic() {
            return false;
        }
    }
    limit.is_none_or(|limit| allowed_seen <= limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_empty() {
        assert!(is_empty(&Value::Null));
        assert!(is_empty(&json!("")));
        assert!(is_empty(&json!("   \t\n")));
        assert!(!is_empty(&json!(0)));
        assert!(!is_empty(&json!(false)));
        assert!(!is_empty(&json!([])));
        assert!(!is_empty(&json!("x")));
    }

    #[test]
    fn test_string_length_counts_characters() {
        assert_eq!(string_length(&json!("héllo")), Some(5));
        assert_eq!(string_length(&json!("日本語")), Some(3));
        assert_eq!(string_length(&json!(12345)), Some(5));
        assert_eq!(string_length(&json!(true)), Some(4));
        assert_eq!(string_length(&json!([1, 2])), None);
    }

    #[test]
    fn test_as_number() {
        assert_eq!(as_number(&json!(10)), Some(10.0));
        assert_eq!(as_number(&json!(1.5)), Some(1.5));
        assert_eq!(as_number(&json!(" 42 ")), Some(42.0));
        assert_eq!(as_number(&json!("abc")), None);
        assert_eq!(as_number(&json!(true)), None);
    }

    #[test]
    fn test_as_boolean_like() {
        assert_eq!(as_boolean_like(&json!(true)), Some(true));
        assert_eq!(as_boolean_like(&json!(0)), Some(false));
        assert_eq!(as_boolean_like(&json!(1)), Some(true));
        assert_eq!(as_boolean_like(&json!("TRUE")), Some(true));
        assert_eq!(as_boolean_like(&json!("0")), Some(false));
        assert_eq!(as_boolean_like(&json!(2)), None);
        assert_eq!(as_boolean_like(&json!("yes")), None);
    }

    #[test]
    fn test_loose_eq() {
        assert!(loose_eq(&json!("admin"), &json!("admin")));
        assert!(loose_eq(&json!(1), &json!("1")));
        assert!(loose_eq(&json!(true), &json!(1)));
        assert!(loose_eq(&Value::Null, &Value::Null));
        assert!(!loose_eq(&json!("admin"), &json!("user")));
        assert!(!loose_eq(&json!(2), &json!("3")));
    }

    #[test]
    fn test_is_email() {
        assert!(is_email(&json!("user@example.com")));
        assert!(is_email(&json!("user+tag@example.co.uk")));
        assert!(!is_email(&json!("@example.com")));
        assert!(!is_email(&json!("user@")));
        assert!(!is_email(&json!(42)));
    }

    #[test]
    fn test_is_uuid_enforces_version_and_variant() {
        assert!(is_uuid(&json!("550e8400-e29b-41d4-a716-446655440000")));
        assert!(is_uuid(&json!("550E8400-E29B-41D4-A716-446655440000")));
        // version nibble 0 is out of range
        assert!(!is_uuid(&json!("550e8400-e29b-01d4-a716-446655440000")));
        // variant nibble must be 8, 9, a or b
        assert!(!is_uuid(&json!("550e8400-e29b-41d4-c716-446655440000")));
        assert!(!is_uuid(&json!("550e8400e29b41d4a716446655440000")));
    }

    #[test]
    fn test_is_date() {
        assert!(is_date(&json!("2024-01-15")));
        assert!(is_date(&json!("2024-01-15T10:30:00Z")));
        assert!(is_date(&json!("15/01/2024")));
        assert!(is_date(&json!("15 January 2024")));
        assert!(!is_date(&json!("not a date")));
        assert!(!is_date(&json!(20240115)));
    }

    #[test]
    fn test_is_timestamp() {
        assert!(is_timestamp(&json!(1700000000)));
        assert!(is_timestamp(&json!("1700000000")));
        assert!(!is_timestamp(&json!("17000.5")));
        assert!(!is_timestamp(&json!(1.5)));
        assert!(!is_timestamp(&json!("-100")));
    }

    #[test]
    fn test_is_json() {
        assert!(is_json(&json!([1, 2])));
        assert!(is_json(&json!({"a": 1})));
        assert!(is_json(&json!(r#"{"a": 1}"#)));
        assert!(is_json(&json!("42")));
        assert!(!is_json(&json!("{broken")));
        assert!(!is_json(&json!(42)));
    }

    #[test]
    fn test_is_ip() {
        assert!(is_ip(&json!("192.168.1.1")));
        assert!(is_ip(&json!("::1")));
        assert!(is_ip(&json!("2001:db8::ff00:42:8329")));
        assert!(!is_ip(&json!("999.1.1.1")));
        assert!(!is_ip(&json!("localhost")));
    }

    #[test]
    fn test_is_phone() {
        assert!(is_phone(&json!("+234 801 234 5678")));
        assert!(is_phone(&json!("(555) 123-4567")));
        assert!(!is_phone(&json!("123")));
        assert!(!is_phone(&json!("call me maybe")));
    }

    #[test]
    fn test_allowed_characters() {
        assert!(allowed_characters(&json!("dave_conco"), "_", Some(2)));
        assert!(allowed_characters(&json!("dave__conco"), "_", Some(2)));
        assert!(!allowed_characters(&json!("da_ve__conco"), "_", Some(2)));
        assert!(!allowed_characters(&json!("dave@conco"), "_", Some(2)));
        assert!(allowed_characters(&json!("plainletters"), "_", None));
    }
}
