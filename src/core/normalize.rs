use crate::domain::model::Identifier;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static PROFILE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"instagram\.com/([A-Za-z0-9_.]+)").expect("profile URL pattern is valid")
});

/// Pulls the handle out of a profile URL such as `https://www.instagram.com/mina.art/`.
///
/// Only the first `instagram.com/<handle>` occurrence counts. Returns `None`
/// when the URL does not contain one.
pub fn handle_from_url(url: &str) -> Option<Identifier> {
    PROFILE_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|handle| Identifier::parse(handle.as_str()))
}

/// A string member of `record` that still has content after trimming.
pub fn non_blank_str<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_handle_from_url() {
        let handle = handle_from_url("https://www.instagram.com/Mina.Art").unwrap();
        assert_eq!(handle.as_str(), "mina.art");

        let handle = handle_from_url("https://instagram.com/_u/ali_dev/?hl=en").unwrap();
        assert_eq!(handle.as_str(), "_u");

        assert!(handle_from_url("https://example.com/ali_dev").is_none());
        assert!(handle_from_url("https://instagram.com/").is_none());
        assert!(handle_from_url("").is_none());
    }

    #[test]
    fn test_handle_stops_at_disallowed_characters() {
        let handle = handle_from_url("instagram.com/reza-code").unwrap();
        assert_eq!(handle.as_str(), "reza");
    }

    #[test]
    fn test_non_blank_str() {
        let record = json!({"value": "  ", "username": " Sara ", "name": 7});
        let record = record.as_object().unwrap();
        assert_eq!(non_blank_str(record, "value"), None);
        assert_eq!(non_blank_str(record, "username"), Some(" Sara "));
        assert_eq!(non_blank_str(record, "name"), None);
        assert_eq!(non_blank_str(record, "title"), None);
    }
}
