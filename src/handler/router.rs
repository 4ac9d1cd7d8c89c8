//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route matching,
//! dispatching and access logging.

use crate::api;
use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

const VIEWER_PATH: &str = "/viewer";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
}

impl<'a> RequestContext<'a> {
    /// Plain GET context for a path, without conditional headers
    pub const fn new(path: &'a str) -> Self {
        Self {
            path,
            is_head: false,
            if_none_match: None,
            if_modified_since: None,
        }
    }

    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        Self {
            is_head: req.method() == Method::HEAD,
            if_none_match: header_string(req, "if-none-match"),
            if_modified_since: header_string(req, "if-modified-since"),
            ..Self::new(req.uri().path())
        }
    }
}

/// Main entry point for HTTP request handling
///
/// The body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext::from_request(&req);
    let response = dispatch(req.method(), &ctx, &state).await;

    if state.access_log() {
        log_access(&req, &response, remote_addr, started, &state);
    }

    Ok(response)
}

/// Check the method, route the request and strip the body for HEAD
pub async fn dispatch(
    method: &Method,
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    match *method {
        Method::GET | Method::HEAD => {}
        Method::OPTIONS => return http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method} {}", ctx.path));
            return http::build_405_response();
        }
    }

    let response = route_request(ctx, state).await;
    if ctx.is_head {
        http::into_head_response(response)
    } else {
        response
    }
}

/// Route request: fixed pages first, then the JSON API, then static files
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    if ctx.path == "/" {
        return http::build_redirect_response(VIEWER_PATH);
    }

    let path = ctx.path.strip_suffix('/').unwrap_or(ctx.path);
    if path.eq_ignore_ascii_case(VIEWER_PATH) {
        let page = Path::new(&state.config.storage.viewer_page);
        return static_files::serve_file(ctx, page).await;
    }

    if let Some(response) = api::handle_api(ctx.path, state).await {
        return response;
    }

    static_files::serve_directory(ctx, &state.config.storage.static_root).await
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn log_access<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    remote_addr: SocketAddr,
    started: Instant,
    state: &AppState,
) {
    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header_string(req, "referer");
    entry.user_agent = header_string(req, "user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, state.config.logging.access_log_format);
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
