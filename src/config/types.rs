// Configuration types module
// Settings for the listener, the exposed directories, logging and connection timeouts

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Filesystem roots exposed by the viewer
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory the capture process writes route JSON files into
    pub captured_dir: String,
    /// Directory holding mock-server route configs
    pub configs_dir: String,
    /// Root for static assets
    pub static_root: String,
    /// Viewer HTML page served at `/viewer`
    pub viewer_page: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    #[serde(default)]
    pub access_log_format: AccessLogFormat,
    /// Access and info lines go to stdout when unset
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Warnings and errors go to stderr when unset
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Line layout of the access log
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccessLogFormat {
    /// Apache/Nginx combined format
    #[default]
    Combined,
    /// Common Log Format (CLF)
    Common,
    /// One JSON object per line
    Json,
}

/// Per-connection settings
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds; the connection deadline is the larger of the two timeouts
    pub read_timeout: u64,
    pub write_timeout: u64,
}
