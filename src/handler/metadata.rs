//! Video catalogue endpoint
//!
//! Returns one JSON document from the asset bundle as-is. Errors are reported
//! as `{"error": "..."}` so the front-end can always parse the reply.

use super::{Handler, HandlerFuture, HandlerResult, RequestContext};
use crate::assets::AssetBundle;
use crate::http::{response, HandlerError};
use hyper::Method;

pub const DEFAULT_METADATA_ASSET: &str = "videos.json";

pub struct MetadataHandler {
    assets: AssetBundle,
    asset_name: String,
}

impl MetadataHandler {
    pub fn new(assets: AssetBundle, asset_name: impl Into<String>) -> Self {
        Self {
            assets,
            asset_name: asset_name.into(),
        }
    }

    async fn serve(&self, ctx: &RequestContext) -> HandlerResult {
        if ctx.method != Method::GET {
            return Err(HandlerError::method_not_allowed());
        }

        match self.assets.read(&self.asset_name).await {
            Ok(Some(data)) => Ok(response::build_json_response(data)),
            Ok(None) => Err(HandlerError::not_found(format!(
                "Catalogue file {} not found",
                self.asset_name
            ))
            .json()),
            Err(e) => Err(HandlerError::internal(format!("Error reading video catalogue: {e}")).json()),
        }
    }
}

impl Handler for MetadataHandler {
    fn name(&self) -> &'static str {
        "MetadataHandler"
    }

    fn handle<'a>(&'a self, ctx: &'a RequestContext) -> HandlerFuture<'a> {
        Box::pin(self.serve(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test_support::{body_bytes, ctx};

    const CATALOGUE: &str = r#"[{"title":"Clip","videoUrl":"/tmp/clip.mp4"}]"#;

    fn handler(entries: &[(&'static str, &'static str)]) -> MetadataHandler {
        MetadataHandler::new(AssetBundle::from_entries(entries.iter().copied()), DEFAULT_METADATA_ASSET)
    }

    #[tokio::test]
    async fn test_get_returns_raw_json() {
        let h = handler(&[("videos.json", CATALOGUE)]);
        let resp = h.handle(&ctx(Method::GET, "/video", None, "/video")).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "application/json; charset=UTF-8");
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(body_bytes(resp).await, CATALOGUE.as_bytes());
    }

    #[tokio::test]
    async fn test_non_get_rejected() {
        let h = handler(&[("videos.json", CATALOGUE)]);
        for method in [Method::POST, Method::PUT, Method::HEAD] {
            let err = h.handle(&ctx(method, "/video", None, "/video")).await.unwrap_err();
            assert_eq!(err.status(), 405);
        }
    }

    #[tokio::test]
    async fn test_missing_catalogue_is_json_404() {
        let h = handler(&[]);
        let resp = h
            .handle(&ctx(Method::GET, "/video", None, "/video"))
            .await
            .unwrap_err()
            .into_response();
        assert_eq!(resp.status(), 404);
        let value: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert!(value["error"].as_str().unwrap().contains("videos.json"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_read_failure_is_json_500() {
        let root = std::env::temp_dir().join(format!("mediaserve-meta-root-{}", std::process::id()));
        std::fs::write(&root, b"plain file").unwrap();
        let h = MetadataHandler::new(AssetBundle::from_dir(&root), DEFAULT_METADATA_ASSET);

        let err = h.handle(&ctx(Method::GET, "/video", None, "/video")).await.unwrap_err();
        assert_eq!(err.status(), 500);
        assert!(err.message().starts_with("Error reading video catalogue: "));
        let resp = err.into_response();
        assert_eq!(resp.headers()["content-type"], "application/json; charset=UTF-8");

        std::fs::remove_file(root).unwrap();
    }
}
