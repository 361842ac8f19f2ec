//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Subscriber setup from the logging configuration
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use crate::routing::Router;
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Target used for access lines so they can be filtered separately
pub const ACCESS_TARGET: &str = "mediaserve::access";

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over `logging.level` when set. Should be called once at
/// application startup.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, router: &Router) {
    tracing::info!("======================================");
    tracing::info!("Media server started successfully");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Worker threads: {}", config.server.workers);
    match &config.assets.dir {
        Some(dir) => tracing::info!("Assets: {dir}"),
        None => tracing::info!("Assets: embedded"),
    }
    for route in router.routes() {
        tracing::info!("Route: {:<10} -> {}", route.prefix(), route.handler().name());
    }
    tracing::info!("======================================");
}

pub fn log_route_registered(prefix: &str, handler: &str) {
    tracing::info!(prefix, handler, "route registered");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}

pub fn log_draining(open: usize, grace: Duration) {
    tracing::info!(
        "Waiting up to {}s for {open} open connection(s) to finish",
        grace.as_secs()
    );
}

pub fn log_shutdown(addr: &SocketAddr) {
    tracing::info!("Server on {addr} stopped");
}
