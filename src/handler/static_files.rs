//! Static asset serving module
//!
//! Serves files from the `static/` part of the asset bundle. Every method is
//! answered the same way as GET.

use super::{Handler, HandlerFuture, RequestContext};
use crate::assets::AssetBundle;
use crate::http::{mime, response, HandlerError};

const ASSET_ROOT: &str = "static";
const INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mount {
    /// Mounted at `/`; the bare root path serves the index page
    Root,
    /// Mounted under a sub-prefix such as `/static/`
    Prefix,
}

pub struct StaticAssetHandler {
    assets: AssetBundle,
    mount: Mount,
}

impl StaticAssetHandler {
    /// Handler for a sub-prefix route
    pub const fn new(assets: AssetBundle) -> Self {
        Self {
            assets,
            mount: Mount::Prefix,
        }
    }

    /// Handler for the `/` route
    pub const fn root(assets: AssetBundle) -> Self {
        Self {
            assets,
            mount: Mount::Root,
        }
    }

    /// Relative asset name requested by `ctx` (without the `static/` root).
    ///
    /// The remainder is joined as-is, so `/static//main.js` looks up
    /// `static//main.js` and misses.
    fn relative_name(&self, ctx: &RequestContext) -> String {
        if self.mount == Mount::Root && ctx.path == "/" {
            return INDEX_FILE.to_string();
        }
        ctx.path_after_prefix().to_string()
    }

    async fn serve(&self, ctx: &RequestContext) -> super::HandlerResult {
        let relative = self.relative_name(ctx);
        let asset = format!("{ASSET_ROOT}/{relative}");

        match self.assets.read(&asset).await? {
            Some(data) => Ok(response::build_asset_response(
                data,
                mime::content_type_for(&relative),
            )),
            None => Err(HandlerError::not_found(match self.mount {
                Mount::Root => format!("File not found: {asset}"),
                Mount::Prefix => format!("Static file not found: {relative}"),
            })),
        }
    }
}

impl Handler for StaticAssetHandler {
    fn name(&self) -> &'static str {
        match self.mount {
            Mount::Root => "RootHandler",
            Mount::Prefix => "StaticAssetHandler",
        }
    }

    fn handle<'a>(&'a self, ctx: &'a RequestContext) -> HandlerFuture<'a> {
        Box::pin(self.serve(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test_support::{body_bytes, ctx};
    use hyper::Method;

    fn bundle() -> AssetBundle {
        AssetBundle::from_entries([
            ("static/index.html", "<h1>home</h1>"),
            ("static/main.js", "console.log(1)"),
            ("static/img/Poster.PNG", "png-bytes"),
        ])
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let handler = StaticAssetHandler::root(bundle());
        let resp = handler.handle(&ctx(Method::GET, "/", None, "/")).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=UTF-8");
        assert_eq!(resp.headers()["content-length"], "13");
        assert_eq!(body_bytes(resp).await, b"<h1>home</h1>");
    }

    #[tokio::test]
    async fn test_root_serves_sub_paths_from_static() {
        let handler = StaticAssetHandler::root(bundle());
        let resp = handler.handle(&ctx(Method::GET, "/main.js", None, "/")).await.unwrap();
        assert_eq!(resp.headers()["content-type"], "application/javascript");
        assert_eq!(body_bytes(resp).await, b"console.log(1)");
    }

    #[tokio::test]
    async fn test_prefix_strips_route() {
        let handler = StaticAssetHandler::new(bundle());
        let resp = handler
            .handle(&ctx(Method::GET, "/static/img/Poster.PNG", None, "/static/"))
            .await
            .unwrap();
        assert_eq!(resp.headers()["content-type"], "image/png");
        assert_eq!(body_bytes(resp).await, b"png-bytes");
    }

    #[tokio::test]
    async fn test_any_method_is_served() {
        let handler = StaticAssetHandler::new(bundle());
        for method in [Method::POST, Method::DELETE, Method::HEAD] {
            let resp = handler
                .handle(&ctx(method, "/static/main.js", None, "/static/"))
                .await
                .unwrap();
            assert_eq!(resp.status(), 200);
        }
    }

    #[tokio::test]
    async fn test_missing_asset_names_resource() {
        let handler = StaticAssetHandler::new(bundle());
        let err = handler
            .handle(&ctx(Method::GET, "/static/nope.css", None, "/static/"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), 404);
        assert!(err.message().contains("nope.css"));

        let root = StaticAssetHandler::root(bundle());
        let err = root.handle(&ctx(Method::GET, "/gone.html", None, "/")).await.unwrap_err();
        assert_eq!(err.message(), "File not found: static/gone.html");
    }

    #[tokio::test]
    async fn test_doubled_slash_is_not_normalized() {
        let handler = StaticAssetHandler::new(bundle());
        let err = handler
            .handle(&ctx(Method::GET, "/static//main.js", None, "/static/"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), 404);
        assert_eq!(err.message(), "Static file not found: /main.js");

        let root = StaticAssetHandler::root(bundle());
        let err = root.handle(&ctx(Method::GET, "//main.js", None, "/")).await.unwrap_err();
        assert_eq!(err.message(), "File not found: static//main.js");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_read_failure_is_internal() {
        // A regular file used as the bundle root makes every lookup fail with ENOTDIR
        let root = std::env::temp_dir().join(format!("mediaserve-static-root-{}", std::process::id()));
        std::fs::write(&root, b"not a directory").unwrap();
        let handler = StaticAssetHandler::new(AssetBundle::from_dir(&root));

        let err = handler
            .handle(&ctx(Method::GET, "/static/app.js", None, "/static/"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), 500);
        assert!(!err.message().is_empty());

        std::fs::remove_file(root).unwrap();
    }
}
