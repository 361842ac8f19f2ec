//! Request dispatch module
//!
//! Entry point for every HTTP request: picks the route, runs its handler,
//! renders handler errors and writes the access log line.

use super::RequestContext;
use crate::http::{HandlerError, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use crate::routing::Router;
use crate::server::AppState;
use hyper::body::Body;
use hyper::http::request::Parts;
use hyper::{Request, Response};
use std::borrow::Cow;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main request handler
///
/// The request body is never read. Every outcome, including handler
/// failures, becomes a response, so the error type is `Infallible`.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();

    let mut access = state
        .logging
        .access_log
        .then(|| AccessLogEntry::from_request(&parts, peer_addr));

    let response = route_request(&state.router, parts).await;

    if let Some(entry) = access.as_mut() {
        entry.finish(
            response.status().as_u16(),
            response.body().size_hint().exact(),
            started.elapsed(),
        );
        logger::log_access(entry, &state.logging.access_log_format);
    }

    Ok(response)
}

/// Dispatch one request to the longest matching route
pub async fn route_request(router: &Router, parts: Parts) -> Response<ResponseBody> {
    let path = decode_path(parts.uri.path());

    let Some(route) = router.dispatch(&path) else {
        return HandlerError::not_found(format!("No route for {path}")).into_response();
    };

    let ctx = RequestContext {
        method: parts.method,
        path,
        query: parts.uri.query().map(str::to_string),
        route_prefix: route.prefix().to_string(),
    };

    match route.handler().handle(&ctx).await {
        Ok(response) => response,
        Err(err) => {
            if err.status().is_server_error() {
                logger::log_error(&format!(
                    "{} failed for {}: {}",
                    route.handler().name(),
                    ctx.path,
                    err.message()
                ));
            }
            err.into_response()
        }
    }
}

/// Percent-decode the request path, keeping it raw if it is not valid UTF-8
fn decode_path(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test_support::body_bytes;
    use crate::handler::{Handler, HandlerFuture};
    use crate::http::response;
    use crate::routing::RouterBuilder;
    use hyper::{Method, StatusCode};

    /// Echoes what the handler saw
    struct Echo;

    impl Handler for Echo {
        fn name(&self) -> &'static str {
            "Echo"
        }

        fn handle<'a>(&'a self, ctx: &'a RequestContext) -> HandlerFuture<'a> {
            let text = format!(
                "{} {} {} {:?}",
                ctx.method,
                ctx.route_prefix,
                ctx.path_after_prefix(),
                ctx.query
            );
            Box::pin(async move { Ok(response::build_text_response(StatusCode::OK, text)) })
        }
    }

    struct Failing;

    impl Handler for Failing {
        fn name(&self) -> &'static str {
            "Failing"
        }

        fn handle<'a>(&'a self, _ctx: &'a RequestContext) -> HandlerFuture<'a> {
            Box::pin(async { Err(HandlerError::bad_request("nope")) })
        }
    }

    fn router() -> Router {
        let mut builder = RouterBuilder::new();
        builder.register("/", Arc::new(Echo)).unwrap();
        builder.register("/static/", Arc::new(Echo)).unwrap();
        builder.register("/fail", Arc::new(Failing)).unwrap();
        builder.freeze()
    }

    fn parts(method: Method, uri: &str) -> Parts {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    async fn text(router: &Router, method: Method, uri: &str) -> String {
        let resp = route_request(router, parts(method, uri)).await;
        String::from_utf8(body_bytes(resp).await).unwrap()
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let router = router();
        assert_eq!(
            text(&router, Method::GET, "/static/app.js").await,
            "GET /static/ app.js None"
        );
        assert_eq!(text(&router, Method::GET, "/other").await, "GET / other None");
    }

    #[tokio::test]
    async fn test_path_is_decoded_and_query_kept_raw() {
        let router = router();
        assert_eq!(
            text(&router, Method::GET, "/static/my%20clip.js?path=%2Fa+b").await,
            "GET /static/ my clip.js Some(\"path=%2Fa+b\")"
        );
    }

    #[tokio::test]
    async fn test_undecodable_path_falls_back_to_raw() {
        let router = router();
        assert_eq!(
            text(&router, Method::GET, "/static/%FF.js").await,
            "GET /static/ %FF.js None"
        );
    }

    #[tokio::test]
    async fn test_handler_error_becomes_response() {
        let resp = route_request(&router(), parts(Method::GET, "/fail")).await;
        assert_eq!(resp.status(), 400);
        assert_eq!(body_bytes(resp).await, b"nope");
    }

    #[tokio::test]
    async fn test_no_route_is_not_found() {
        let mut builder = RouterBuilder::new();
        builder.register("/video", Arc::new(Echo)).unwrap();
        let router = builder.freeze();

        let resp = route_request(&router, parts(Method::GET, "/elsewhere")).await;
        assert_eq!(resp.status(), 404);
        assert_eq!(body_bytes(resp).await, b"No route for /elsewhere");
    }

    #[tokio::test]
    async fn test_handle_request_with_access_log() {
        let state = Arc::new(AppState::new(router(), crate::config::LoggingConfig::default()));
        let req = Request::get("/static/x.js").body(()).unwrap();
        let resp = handle_request(req, state, "127.0.0.1:4000".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }
}
