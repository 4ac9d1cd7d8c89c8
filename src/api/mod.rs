// API module entry
// JSON endpoints over the capture store: /api/*, /capture/* and /health

mod handlers;
mod response;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::borrow::Cow;

use crate::config::AppState;

/// API route handler
///
/// Returns `None` when the path is not an API endpoint so the caller can fall
/// through to static files. Fixed segments match case-insensitively, path
/// parameters are percent-decoded as given, and a trailing slash is tolerated.
pub async fn handle_api(path: &str, state: &AppState) -> Option<Response<Full<Bytes>>> {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    let segments: Vec<&str> = trimmed.split('/').skip(1).collect();
    let lowered: Vec<String> = segments.iter().map(|s| s.to_ascii_lowercase()).collect();
    let keys: Vec<&str> = lowered.iter().map(String::as_str).collect();

    let response = match (keys.as_slice(), segments.as_slice()) {
        (["api", "files", _], [_, _, directory]) if !directory.is_empty() => {
            match decode_param(directory) {
                Ok(directory) => handlers::handle_list_files(state, &directory).await,
                Err(resp) => resp,
            }
        }
        (["api", "file", _, _], [_, _, directory, filename])
            if !directory.is_empty() && !filename.is_empty() =>
        {
            match (decode_param(directory), decode_param(filename)) {
                (Ok(directory), Ok(filename)) => {
                    handlers::handle_read_file(state, &directory, &filename).await
                }
                (Err(resp), _) | (_, Err(resp)) => resp,
            }
        }
        (["capture", "status"], _) => handlers::handle_capture_status(state).await,
        (["capture", "live"], _) => handlers::handle_capture_live(state).await,
        (["health"], _) => handlers::handle_health(state),
        _ => return None,
    };

    Some(response)
}

fn decode_param(raw: &str) -> Result<Cow<'_, str>, Response<Full<Bytes>>> {
    urlencoding::decode(raw)
        .map_err(|_| response::bad_request(&format!("Failed to decode param '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use serde_json::{json, Value};
    use std::path::Path;
    use tempfile::TempDir;

    struct Fixture {
        captured: TempDir,
        configs: TempDir,
        state: AppState,
    }

    fn fixture() -> Fixture {
        let captured = tempfile::tempdir().unwrap();
        let configs = tempfile::tempdir().unwrap();
        let cfg = Config::for_tests(captured.path(), configs.path(), configs.path());
        Fixture {
            state: AppState::new(&cfg),
            captured,
            configs,
        }
    }

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    async fn call(state: &AppState, path: &str) -> (StatusCode, Value) {
        let resp = handle_api(path, state).await.expect("API route");
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_non_api_paths_fall_through() {
        let fx = fixture();
        assert!(handle_api("/viewer", &fx.state).await.is_none());
        assert!(handle_api("/api/files", &fx.state).await.is_none());
        assert!(handle_api("/api/files/", &fx.state).await.is_none());
        assert!(handle_api("/api/file/configs", &fx.state).await.is_none());
        assert!(handle_api("/capture", &fx.state).await.is_none());
        assert!(handle_api("/app.js", &fx.state).await.is_none());
    }

    #[tokio::test]
    async fn test_list_files_endpoint() {
        let fx = fixture();
        write(fx.configs.path(), "routes.json", r#"{"routes":[]}"#);
        write(fx.configs.path(), "readme.txt", "skip");

        let (status, body) = call(&fx.state, "/api/files/configs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{
                "name": "routes.json",
                "path": fx.configs.path().join("routes.json").display().to_string(),
                "size": 13
            }])
        );

        let (status, body) = call(&fx.state, "/api/files/whatever/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_list_files_missing_dir_is_empty_array() {
        let fx = fixture();
        let cfg = Config::for_tests(
            &fx.captured.path().join("gone"),
            fx.configs.path(),
            fx.configs.path(),
        );
        let state = AppState::new(&cfg);

        let (status, body) = call(&state, "/api/files/captured").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_read_file_endpoint() {
        let fx = fixture();
        let doc = json!({"routes": [{"method": "GET", "path": "/users"}, {"method": "GET", "path": "/orders"}]});
        write(fx.captured.path(), "capture 1.json", &doc.to_string());

        let (status, body) = call(&fx.state, "/api/file/captured/capture%201.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, doc);
    }

    #[tokio::test]
    async fn test_read_file_not_found_shapes() {
        let fx = fixture();
        write(fx.captured.path(), "broken.json", "{");

        for path in [
            "/api/file/captured/missing.json",
            "/api/file/captured/broken.json",
            "/api/file/configs/..%2Fsecret.json",
        ] {
            let (status, body) = call(&fx.state, path).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
            assert_eq!(body, json!({"error": "File not found"}));
        }
    }

    #[tokio::test]
    async fn test_undecodable_param() {
        let fx = fixture();
        let (status, _) = call(&fx.state, "/api/file/captured/%FF.json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_capture_status_endpoint() {
        let fx = fixture();
        write(fx.captured.path(), "a.json", r#"{"routes":[1,2,3]}"#);
        write(fx.captured.path(), "b.json", r#"{"routes":[1,2,3,4,5]}"#);
        write(fx.captured.path(), "c.json", "not json");

        let (status, body) = call(&fx.state, "/capture/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "running", "captured_routes": 8, "files": 3}));
    }

    #[tokio::test]
    async fn test_capture_live_endpoint() {
        let fx = fixture();
        let (status, body) = call(&fx.state, "/capture/live").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"count": 0, "routes": []}));

        write(fx.captured.path(), "mitm_captured.json", r#"{"routes":[{"path":"/a"}]}"#);
        let (status, body) = call(&fx.state, "/capture/live").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["routes"], json!([{"path": "/a"}]));
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_fixed_segments_ignore_case() {
        let fx = fixture();
        write(fx.configs.path(), "routes.json", "{}");

        let (status, body) = call(&fx.state, "/Health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (_, body) = call(&fx.state, "/API/Files/configs").await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));

        let (status, _) = call(&fx.state, "/Capture/LIVE").await;
        assert_eq!(status, StatusCode::OK);

        // Parameters keep their case: `Configs` is not the configs alias
        let (_, body) = call(&fx.state, "/api/files/Configs").await;
        assert_eq!(body, json!([]));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_capture_live_unstattable_entry_is_500() {
        let fx = fixture();
        write(fx.captured.path(), "good.json", r#"{"routes":[1]}"#);
        std::os::unix::fs::symlink(
            fx.captured.path().join("missing-target"),
            fx.captured.path().join("dangling.json"),
        )
        .unwrap();

        let (status, body) = call(&fx.state, "/capture/live").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "No captures available"}));

        let (_, body) = call(&fx.state, "/api/files/captured").await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_capture_live_null_document_is_500() {
        let fx = fixture();
        write(fx.captured.path(), "capture.json", "null");

        let (status, body) = call(&fx.state, "/capture/live").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "No captures available"}));
    }

    #[tokio::test]
    async fn test_missing_capture_dir_endpoints() {
        let fx = fixture();
        let cfg = Config::for_tests(
            &fx.captured.path().join("gone"),
            fx.configs.path(),
            fx.configs.path(),
        );
        let state = AppState::new(&cfg);

        let (status, body) = call(&state, "/capture/live").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "No captures available"}));

        let (status, body) = call(&state, "/capture/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "error", "captured_routes": 0, "files": 0}));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let fx = fixture();
        let (status, body) = call(&fx.state, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "healthy", "captured_dir": fx.captured.path().display().to_string()})
        );
    }
}
