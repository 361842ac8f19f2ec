// Configuration module entry point
// Loads the startup configuration; nothing here changes after the server starts

mod types;

use std::net::SocketAddr;
use std::time::Duration;

// Re-export public types
pub use types::{AssetsConfig, Config, LoggingConfig, PerformanceConfig, ServerConfig};

/// Environment variable prefix, e.g. `MEDIASERVE__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "MEDIASERVE";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", 10)?
            .set_default("server.shutdown_timeout", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("assets.metadata", crate::handler::metadata::DEFAULT_METADATA_ASSET)?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        if config.server.workers == 0 {
            return Err(config::ConfigError::Message(
                "server.workers must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    pub const fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout)
    }
}
