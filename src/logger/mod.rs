//! Logger module
//!
//! Plain-text logging for the viewer: startup banner, access lines in the
//! configured format, and tagged info/warning/error messages. Output targets
//! are picked once by [`init`]; before that everything goes to the console.

mod format;
mod writer;

pub use format::AccessLogEntry;

use crate::config::{AccessLogFormat, Config};
use std::net::SocketAddr;
use std::path::Path;

/// Severity of a log line; decides the sink and the tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Access,
    Info,
    Warn,
    Error,
}

impl Level {
    const fn tag(self) -> Option<&'static str> {
        match self {
            Self::Access => None,
            Self::Info => Some("[INFO]"),
            Self::Warn => Some("[WARN]"),
            Self::Error => Some("[ERROR]"),
        }
    }
}

/// Open the configured log files
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn emit(level: Level, message: &str) {
    let out = writer::get();
    match level.tag() {
        Some(tag) => out.write(level, &format!("{tag} {message}")),
        None => out.write(level, message),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    let storage = &config.storage;
    emit(Level::Info, &format!("Viewer server running on http://{addr}"));
    emit(Level::Info, &format!("Viewer page: http://{addr}/viewer"));
    for (label, dir) in [
        ("Captured directory", &storage.captured_dir),
        ("Configs directory", &storage.configs_dir),
        ("Static root", &storage.static_root),
    ] {
        if Path::new(dir).is_dir() {
            emit(Level::Info, &format!("{label}: {dir}"));
        } else {
            emit(Level::Warn, &format!("{label} not found (yet): {dir}"));
        }
    }
    if let Some(ref path) = config.logging.access_log_file {
        emit(Level::Info, &format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        emit(Level::Info, &format!("Error log: {path}"));
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    emit(Level::Error, &format!("Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    emit(Level::Error, message);
}

pub fn log_warning(message: &str) {
    emit(Level::Warn, message);
}

pub fn log_info(message: &str) {
    emit(Level::Info, message);
}

pub fn log_access(entry: &AccessLogEntry, format: AccessLogFormat) {
    emit(Level::Access, &entry.format(format));
}
