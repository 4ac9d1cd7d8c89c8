//! Capture module
//!
//! File exposure service over the capture and configs directories: listing,
//! single-file reads, the aggregate route count and the latest capture.

mod error;
mod store;
mod types;

pub use store::CaptureStore;
pub use types::{DirectoryAlias, HealthStatus};
