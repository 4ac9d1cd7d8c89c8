// Configuration module entry point
// Loads layered configuration and exposes the immutable application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{AccessLogFormat, Config, StorageConfig};

/// Environment prefix for nested overrides, e.g. `VIEWER_LOGGING__ACCESS_LOG=false`
const ENV_PREFIX: &str = "VIEWER";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources in increasing priority: built-in defaults, the optional file,
    /// `VIEWER_*` environment variables, then the bare `PORT` and `CAPTURED_DIR`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with_overrides(
            config_path,
            std::env::var("PORT").ok(),
            std::env::var("CAPTURED_DIR").ok(),
        )
    }

    /// Same as [`Config::load_from`] with the bare overrides passed explicitly.
    /// Empty values count as unset.
    pub fn load_with_overrides(
        config_path: &str,
        port: Option<String>,
        captured_dir: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let port = port.filter(|v| !v.is_empty());
        let captured_dir = captured_dir.filter(|v| !v.is_empty());
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8090)?
            .set_default("storage.captured_dir", "/app/captured")?
            .set_default("storage.configs_dir", "/app/configs")?
            .set_default("storage.static_root", "/app")?
            .set_default("storage.viewer_page", "/app/viewer.html")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.port", port)?
            .set_override_option("storage.captured_dir", captured_dir)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Fixed configuration rooted at the given directories, with access logging off
    #[cfg(test)]
    pub fn for_tests(
        captured_dir: &std::path::Path,
        configs_dir: &std::path::Path,
        static_root: &std::path::Path,
    ) -> Self {
        Self {
            server: types::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            storage: types::StorageConfig {
                captured_dir: captured_dir.display().to_string(),
                configs_dir: configs_dir.display().to_string(),
                static_root: static_root.display().to_string(),
                viewer_page: static_root.join("viewer.html").display().to_string(),
            },
            logging: types::LoggingConfig {
                access_log: false,
                access_log_format: AccessLogFormat::Combined,
                access_log_file: None,
                error_log_file: None,
            },
            performance: types::PerformanceConfig {
                keep_alive: true,
                read_timeout: 5,
                write_timeout: 5,
            },
        }
    }
}
