//! MIME type detection module
//!
//! Content-Type for the assets a browser viewer page pulls in.

use std::path::Path;

/// Get MIME Content-Type for a file path based on its extension
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        // Documents and scripts
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json" | "map") => "application/json; charset=utf-8",
        Some("txt" | "md" | "log") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("yaml" | "yml") => "application/yaml",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_assets() {
        assert_eq!(content_type_for(Path::new("/app/viewer.html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Path::new("app.JS")), "application/javascript; charset=utf-8");
        assert_eq!(
            content_type_for(Path::new("captured/all-captured.json")),
            "application/json; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("favicon.svg")), "image/svg+xml");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type_for(Path::new("blob.xyz")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("Makefile")), "application/octet-stream");
    }
}
