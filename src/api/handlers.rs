// Capture API handlers
// Each handler maps one capture-store operation onto its HTTP response

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::response::{file_not_found, no_captures};
use crate::capture::{DirectoryAlias, HealthStatus};
use crate::config::AppState;
use crate::http::build_json_response;
use crate::logger;

/// GET /api/files/:directory
pub async fn handle_list_files(state: &AppState, directory: &str) -> Response<Full<Bytes>> {
    let entries = state
        .store
        .list_files(DirectoryAlias::from_token(directory))
        .await;
    build_json_response(StatusCode::OK, &entries)
}

/// GET /api/file/:directory/:filename
pub async fn handle_read_file(
    state: &AppState,
    directory: &str,
    filename: &str,
) -> Response<Full<Bytes>> {
    match state
        .store
        .read_file(DirectoryAlias::from_token(directory), filename)
        .await
    {
        Ok(doc) => build_json_response(StatusCode::OK, &doc),
        Err(e) => {
            logger::log_warning(&format!("File request failed: {e}"));
            file_not_found()
        }
    }
}

/// GET /capture/status
pub async fn handle_capture_status(state: &AppState) -> Response<Full<Bytes>> {
    build_json_response(StatusCode::OK, &state.store.status().await)
}

/// GET /capture/live
pub async fn handle_capture_live(state: &AppState) -> Response<Full<Bytes>> {
    match state.store.live().await {
        Ok(live) => build_json_response(StatusCode::OK, &live),
        Err(e) => {
            logger::log_error(&format!("Latest capture unavailable: {e}"));
            no_captures()
        }
    }
}

/// GET /health
pub fn handle_health(state: &AppState) -> Response<Full<Bytes>> {
    build_json_response(
        StatusCode::OK,
        &HealthStatus {
            status: "healthy",
            captured_dir: &state.config.storage.captured_dir,
        },
    )
}
