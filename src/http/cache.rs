//! HTTP cache validation module
//!
//! Builds `ETag` / `Last-Modified` validators from file metadata and answers
//! conditional requests.

use chrono::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Cache validators for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validators {
    /// Weak `ETag`, e.g. `W/"1a-18f2c3d4e5"`
    pub etag: String,
    /// RFC 7231 date, absent when the platform reports no mtime
    pub last_modified: Option<String>,
    modified_secs: Option<i64>,
}

impl Validators {
    /// Derive validators from size and modification time, no file read needed
    pub fn from_metadata(len: u64, modified: Option<SystemTime>) -> Self {
        let modified_ms = modified
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_millis());
        let modified_utc = modified.map(DateTime::<Utc>::from);

        Self {
            etag: format!("W/\"{len:x}-{modified_ms:x}\""),
            last_modified: modified_utc
                .map(|t| t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()),
            modified_secs: modified_utc.map(|t| t.timestamp()),
        }
    }

    /// Whether the client's cached copy is still valid.
    ///
    /// `If-None-Match` takes precedence; `If-Modified-Since` is consulted only
    /// when it is absent.
    pub fn is_fresh(&self, if_none_match: Option<&str>, if_modified_since: Option<&str>) -> bool {
        if let Some(client_etags) = if_none_match {
            return check_etag_match(client_etags, &self.etag);
        }

        match (if_modified_since, self.modified_secs) {
            (Some(since), Some(modified)) => DateTime::parse_from_rfc2822(since)
                .is_ok_and(|since| modified <= since.timestamp()),
            _ => false,
        }
    }
}

/// Weak comparison of `If-None-Match` against an `ETag`, including lists and `*`
pub fn check_etag_match(if_none_match: &str, etag: &str) -> bool {
    let ours = strip_weak(etag);
    if_none_match.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || strip_weak(candidate) == ours
    })
}

fn strip_weak(etag: &str) -> &str {
    etag.strip_prefix("W/").unwrap_or(etag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn validators() -> Validators {
        Validators::from_metadata(26, Some(UNIX_EPOCH + Duration::from_millis(1_714_564_800_123)))
    }

    #[test]
    fn test_validators_format() {
        let v = validators();
        assert_eq!(v.etag, "W/\"1a-18f34069e7b\"");
        assert_eq!(v.last_modified.as_deref(), Some("Wed, 01 May 2024 12:00:00 GMT"));
    }

    #[test]
    fn test_missing_mtime() {
        let v = Validators::from_metadata(3, None);
        assert_eq!(v.etag, "W/\"3-0\"");
        assert!(v.last_modified.is_none());
        assert!(!v.is_fresh(None, Some("Wed, 01 May 2024 12:00:00 GMT")));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "W/\"1a-10\"";
        assert!(check_etag_match("W/\"1a-10\"", etag));
        assert!(check_etag_match("\"1a-10\"", etag));
        assert!(check_etag_match("\"xyz\", W/\"1a-10\"", etag));
        assert!(check_etag_match("*", etag));
        assert!(!check_etag_match("\"different\"", etag));
    }

    #[test]
    fn test_if_modified_since() {
        let v = validators();
        assert!(v.is_fresh(None, Some("Wed, 01 May 2024 12:00:00 GMT")));
        assert!(v.is_fresh(None, Some("Thu, 02 May 2024 08:00:00 GMT")));
        assert!(!v.is_fresh(None, Some("Tue, 30 Apr 2024 12:00:00 GMT")));
        assert!(!v.is_fresh(None, Some("garbage")));
        assert!(!v.is_fresh(None, None));
    }

    #[test]
    fn test_if_none_match_wins() {
        let v = validators();
        assert!(!v.is_fresh(Some("\"other\""), Some("Thu, 02 May 2024 08:00:00 GMT")));
    }
}
