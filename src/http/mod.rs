//! HTTP protocol layer module
//!
//! Response builders, MIME detection and conditional-request helpers, kept free of
//! capture-specific logic.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use response::{
    build_304_response, build_404_response, build_405_response, build_file_response,
    build_json_response, build_options_response, build_redirect_response, into_head_response,
};
