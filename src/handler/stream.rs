//! Raw file streaming endpoint
//!
//! `GET /stream?path=<url-encoded path>` sends the whole file at that path.
//! The path is taken from the client as-is: it is neither confined to a root
//! directory nor canonicalized.

use super::{Handler, HandlerFuture, HandlerResult, RequestContext};
use crate::assets;
use crate::http::{response, HandlerError};
use hyper::Method;
use std::borrow::Cow;
use std::path::Path;
use thiserror::Error;

const PATH_PARAM: &str = "path=";

pub struct StreamHandler;

impl StreamHandler {
    async fn serve(ctx: &RequestContext) -> HandlerResult {
        if ctx.method != Method::GET {
            return Err(HandlerError::method_not_allowed());
        }

        let Some(raw) = ctx.query.as_deref().and_then(|q| q.strip_prefix(PATH_PARAM)) else {
            return Err(HandlerError::bad_request("Missing required query parameter 'path'"));
        };

        let path = decode_form_value(raw)
            .map_err(|e| HandlerError::internal(format!("Error streaming video: {e}")))?;

        match assets::open_stream(Path::new(&path)).await {
            Ok(Some(source)) => {
                let len = source.len();
                Ok(response::build_stream_response(source.into_chunks(), len))
            }
            Ok(None) => Err(HandlerError::not_found(format!("Video not found: {path}"))),
            Err(e) => Err(HandlerError::internal(format!("Error streaming video: {e}"))),
        }
    }
}

impl Handler for StreamHandler {
    fn name(&self) -> &'static str {
        "StreamHandler"
    }

    fn handle<'a>(&'a self, ctx: &'a RequestContext) -> HandlerFuture<'a> {
        Box::pin(Self::serve(ctx))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
enum DecodeError {
    #[error("incomplete or invalid percent escape at byte {0}")]
    Escape(usize),
    #[error("decoded path is not valid UTF-8")]
    Utf8,
}

/// Decode an `application/x-www-form-urlencoded` value as UTF-8.
///
/// Every `%` must start a two hex digit escape.
fn decode_form_value(raw: &str) -> Result<String, DecodeError> {
    let bytes = raw.as_bytes();
    if let Some(at) = bytes.iter().enumerate().find_map(|(i, &b)| {
        let valid = bytes
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        (b == b'%' && !valid).then_some(i)
    }) {
        return Err(DecodeError::Escape(at));
    }

    urlencoding::decode(&raw.replace('+', " "))
        .map(Cow::into_owned)
        .map_err(|_| DecodeError::Utf8)
}
