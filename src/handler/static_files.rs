//! Static file serving module
//!
//! Serves the viewer page and anything else under the static root, with
//! conditional-request support and traversal protection.

use crate::handler::router::RequestContext;
use crate::http::{self, cache::Validators, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

const INDEX_FILE: &str = "index.html";

/// Serve a single file by path
pub async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<Full<Bytes>> {
    let Ok(meta) = fs::metadata(file_path).await else {
        return http::build_404_response();
    };
    if !meta.is_file() {
        return http::build_404_response();
    }

    let validators = Validators::from_metadata(meta.len(), meta.modified().ok());
    if validators.is_fresh(ctx.if_none_match.as_deref(), ctx.if_modified_since.as_deref()) {
        return http::build_304_response(&validators);
    }

    match fs::read(file_path).await {
        Ok(content) => http::build_file_response(
            Bytes::from(content),
            mime::content_type_for(file_path),
            &validators,
        ),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            http::build_404_response()
        }
    }
}

/// Serve the request path from the static root
pub async fn serve_directory(ctx: &RequestContext<'_>, static_root: &str) -> Response<Full<Bytes>> {
    match resolve_static_path(static_root, ctx.path).await {
        Some(path) => serve_file(ctx, &path).await,
        None => http::build_404_response(),
    }
}

/// Map a request path onto a file below `static_root`.
///
/// Directories resolve to their `index.html`. Dotfiles, `..` segments and
/// anything whose canonical path leaves the root are refused.
pub async fn resolve_static_path(static_root: &str, request_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(request_path).ok()?;
    let relative = Path::new(decoded.trim_start_matches('/'));

    let safe = relative.components().all(|component| match component {
        Component::Normal(name) => !name.to_string_lossy().starts_with('.'),
        Component::CurDir => true,
        _ => false,
    });
    if !safe || decoded.contains('\0') {
        return None;
    }

    let root = match fs::canonicalize(static_root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static root not found or inaccessible '{static_root}': {e}"
            ));
            return None;
        }
    };

    let mut file_path = root.join(relative);
    if fs::metadata(&file_path).await.ok()?.is_dir() {
        file_path = file_path.join(INDEX_FILE);
    }

    // Missing files are the common 404, not worth a warning
    let canonical = fs::canonicalize(&file_path).await.ok()?;
    if !canonical.starts_with(&root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path} -> {}",
            canonical.display()
        ));
        return None;
    }

    Some(canonical)
}
