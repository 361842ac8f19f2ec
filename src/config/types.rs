// Configuration types module
// Defines all configuration-related data structures

use crate::handler::metadata::DEFAULT_METADATA_ASSET;
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Number of runtime worker threads
    pub workers: usize,
    /// Seconds open connections get to finish after shutdown starts
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,
}

const fn default_shutdown_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: 10,
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: default_access_log_format(),
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// HTTP/1.1 persistent connections
    pub keep_alive: bool,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self { keep_alive: true }
    }
}

/// Asset bundle configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    /// Serve assets from this directory instead of the embedded bundle
    #[serde(default)]
    pub dir: Option<String>,
    /// Bundle entry returned by `/video`
    #[serde(default = "default_metadata_asset")]
    pub metadata: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_metadata_asset() -> String {
    DEFAULT_METADATA_ASSET.to_string()
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            metadata: default_metadata_asset(),
        }
    }
}
