//! Request handler module
//!
//! Routes each request to the capture API, the viewer page or static files.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
