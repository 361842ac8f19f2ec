//! Prefix-routed HTTP server for a small video site.
//!
//! The binary registers four routes on a [`server::Server`]:
//! - `/` and `/static/` serve the bundled front-end
//! - `/video` returns the JSON catalogue
//! - `/stream?path=...` sends a video file from disk

pub mod assets;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
