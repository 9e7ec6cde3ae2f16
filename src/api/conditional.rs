//! Conditional GET support: `If-None-Match` evaluation and validator headers.

use axum::http::{
    header::{CACHE_CONTROL, ETAG, VARY},
    HeaderMap, HeaderValue,
};

/// Whether an `If-None-Match` header value matches `etag`.
///
/// Uses weak comparison: `W/"x"` and `"x"` are equal. The header may list
/// several validators separated by commas, or be `*`.
pub fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    let current = opaque_tag(etag);
    if_none_match
        .split(',')
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .any(|candidate| candidate == "*" || opaque_tag(candidate) == current)
}

fn opaque_tag(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}

/// Headers sent with every listing response, `200` or `304`.
pub fn validator_headers(etag: &str, max_age: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(etag) {
        headers.insert(ETAG, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("private, max-age={}", max_age)) {
        headers.insert(CACHE_CONTROL, value);
    }
    headers.insert(VARY, HeaderValue::from_static("If-None-Match"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAG: &str = "W/\"abc123\"";

    #[test]
    fn test_exact_and_weak_match() {
        assert!(etag_matches(TAG, TAG));
        assert!(etag_matches("\"abc123\"", TAG));
        assert!(!etag_matches("W/\"abc124\"", TAG));
    }

    #[test]
    fn test_list_and_wildcard() {
        assert!(etag_matches("\"zzz\", W/\"abc123\"", TAG));
        assert!(etag_matches("*", TAG));
        assert!(!etag_matches("", TAG));
    }

    #[test]
    fn test_validator_headers() {
        let headers = validator_headers(TAG, 60);
        assert_eq!(headers[ETAG], TAG);
        assert_eq!(headers[CACHE_CONTROL], "private, max-age=60");
        assert_eq!(headers[VARY], "If-None-Match");
    }
}
