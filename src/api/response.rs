// API error bodies shared by the JSON endpoints

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::http::build_json_response;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// `{"error": message}` with the given status
pub fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    build_json_response(status, &ErrorBody { error: message })
}

/// 404 for a single-file read; missing and malformed files look the same
pub fn file_not_found() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, "File not found")
}

/// 500 for any failure while fetching the latest capture
pub fn no_captures() -> Response<Full<Bytes>> {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "No captures available")
}

/// 400 for a path parameter that does not percent-decode to UTF-8
pub fn bad_request(message: &str) -> Response<Full<Bytes>> {
    error_response(StatusCode::BAD_REQUEST, message)
}
