//! Capture data types
//!
//! Everything here is derived from the filesystem on each request and never persisted.

use serde::Serialize;
use serde_json::Value;

/// Logical directory name as it appears in `/api/files/:directory`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryAlias {
    /// Mock-server route configs
    Configs,
    /// Captured route files (also the fallback for unknown tokens)
    Captured,
}

impl DirectoryAlias {
    /// Only the exact token `configs` selects the configs root
    pub fn from_token(token: &str) -> Self {
        if token == "configs" {
            Self::Configs
        } else {
            Self::Captured
        }
    }
}

/// One `.json` file in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub size: u64,
}

/// Aggregate route count over the capture directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureStatus {
    pub status: &'static str,
    pub captured_routes: usize,
    pub files: usize,
}

impl CaptureStatus {
    pub const fn running(captured_routes: usize, files: usize) -> Self {
        Self {
            status: "running",
            captured_routes,
            files,
        }
    }

    pub const fn error() -> Self {
        Self {
            status: "error",
            captured_routes: 0,
            files: 0,
        }
    }
}

/// Contents of the most recently modified capture file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveCapture {
    pub count: usize,
    pub routes: Vec<Value>,
    /// ISO-8601 UTC modification time, absent when there is no capture yet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl LiveCapture {
    pub const fn empty() -> Self {
        Self {
            count: 0,
            routes: Vec::new(),
            timestamp: None,
        }
    }
}

/// Health check body
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus<'a> {
    pub status: &'static str,
    pub captured_dir: &'a str,
}

/// Number of routes in a capture document.
///
/// Anything other than an object with a `routes` array counts as zero.
pub fn route_count(doc: &Value) -> usize {
    doc.get("routes").and_then(Value::as_array).map_or(0, Vec::len)
}

/// Take the `routes` array out of a capture document, or an empty list
pub fn into_routes(doc: Value) -> Vec<Value> {
    match doc {
        Value::Object(mut map) => match map.remove("routes") {
            Some(Value::Array(routes)) => routes,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alias_from_token() {
        assert_eq!(DirectoryAlias::from_token("configs"), DirectoryAlias::Configs);
        assert_eq!(DirectoryAlias::from_token("captured"), DirectoryAlias::Captured);
        assert_eq!(DirectoryAlias::from_token("Configs"), DirectoryAlias::Captured);
        assert_eq!(DirectoryAlias::from_token(""), DirectoryAlias::Captured);
    }

    #[test]
    fn test_route_count_tolerates_shape() {
        assert_eq!(route_count(&json!({"routes": [1, 2, 3]})), 3);
        assert_eq!(route_count(&json!({"routes": []})), 0);
        assert_eq!(route_count(&json!({"other": true})), 0);
        assert_eq!(route_count(&json!({"routes": null})), 0);
        assert_eq!(route_count(&json!({"routes": "abc"})), 0);
        assert_eq!(route_count(&json!([1, 2])), 0);
    }

    #[test]
    fn test_into_routes() {
        let routes = into_routes(json!({"routes": [{"path": "/a"}], "total_captures": 1}));
        assert_eq!(routes, vec![json!({"path": "/a"})]);
        assert!(into_routes(json!({"routes": {"path": "/a"}})).is_empty());
        assert!(into_routes(json!(42)).is_empty());
    }

    #[test]
    fn test_live_serialization_omits_missing_timestamp() {
        let body = serde_json::to_value(LiveCapture::empty()).unwrap();
        assert_eq!(body, json!({"count": 0, "routes": []}));
    }

    #[test]
    fn test_status_serialization() {
        let body = serde_json::to_value(CaptureStatus::error()).unwrap();
        assert_eq!(body, json!({"status": "error", "captured_routes": 0, "files": 0}));
    }
}
