//! Request handler module
//!
//! Every route is served by a `Handler`: it receives the request context and
//! produces a complete response or a `HandlerError` that the dispatch
//! boundary turns into one.

pub mod dispatch;
pub mod metadata;
pub mod static_files;
pub mod stream;

use crate::assets::AssetBundle;
use crate::http::{HandlerError, ResponseBody};
use crate::routing::RouteError;
use crate::server::Server;
use hyper::{Method, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

// Re-export main entry point
pub use dispatch::handle_request;
pub use metadata::MetadataHandler;
pub use static_files::StaticAssetHandler;
pub use stream::StreamHandler;

pub type HandlerResult = Result<Response<ResponseBody>, HandlerError>;
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = HandlerResult> + Send + 'a>>;

/// Read-only view of one request, built once after routing
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Percent-decoded request path
    pub path: String,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
    /// Prefix of the route that matched `path`
    pub route_prefix: String,
}

impl RequestContext {
    /// Path with the matched route prefix removed
    pub fn path_after_prefix(&self) -> &str {
        self.path
            .strip_prefix(self.route_prefix.as_str())
            .unwrap_or(&self.path)
    }
}

pub trait Handler: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn handle<'a>(&'a self, ctx: &'a RequestContext) -> HandlerFuture<'a>;
}

/// Register the media site routes on `server`
pub fn register_media_routes(
    server: &mut Server,
    assets: &AssetBundle,
    metadata_asset: &str,
) -> Result<(), RouteError> {
    server.register("/", Arc::new(StaticAssetHandler::root(assets.clone())))?;
    server.register("/static/", Arc::new(StaticAssetHandler::new(assets.clone())))?;
    server.register(
        "/video",
        Arc::new(MetadataHandler::new(assets.clone(), metadata_asset)),
    )?;
    server.register("/stream", Arc::new(StreamHandler))?;
    Ok(())
}
