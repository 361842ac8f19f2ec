//! HTTP response building module
//!
//! Builders for every response the handlers produce. Headers are added in the
//! order they should appear on the wire.

use super::body::{FileChunks, ResponseBody};
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";
pub const STREAM_CONTENT_TYPE: &str = "video/mp4";

/// Build 200 response for an in-memory asset
pub fn build_asset_response(data: Bytes, content_type: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", data.len())
        .body(ResponseBody::full(data))
        .unwrap_or_else(|e| fallback("asset", &e))
}

/// Build 200 JSON response readable from any origin
pub fn build_json_response(data: Bytes) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", JSON_CONTENT_TYPE)
        .header("Access-Control-Allow-Origin", "*")
        .header("Content-Length", data.len())
        .body(ResponseBody::full(data))
        .unwrap_or_else(|e| fallback("json", &e))
}

/// Build 200 streaming response for a media file
///
/// `Accept-Ranges` is advertised for players that check for it, but every
/// request is answered with the whole file.
pub fn build_stream_response(chunks: FileChunks, len: u64) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", STREAM_CONTENT_TYPE)
        .header("Accept-Ranges", "bytes")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, OPTIONS")
        .header("Access-Control-Allow-Headers", "Range")
        .header("Content-Length", len)
        .body(ResponseBody::File(chunks))
        .unwrap_or_else(|e| fallback("stream", &e))
}

/// Build a plain-text response with the given status
pub fn build_text_response(status: StatusCode, message: String) -> Response<ResponseBody> {
    let data = Bytes::from(message);
    Response::builder()
        .status(status)
        .header("Content-Type", TEXT_CONTENT_TYPE)
        .header("Content-Length", data.len())
        .body(ResponseBody::full(data))
        .unwrap_or_else(|e| fallback(status.as_str(), &e))
}

/// Build a JSON error envelope response with the given status
pub fn build_json_error_response(status: StatusCode, envelope: String) -> Response<ResponseBody> {
    let data = Bytes::from(envelope);
    Response::builder()
        .status(status)
        .header("Content-Type", JSON_CONTENT_TYPE)
        .header("Content-Length", data.len())
        .body(ResponseBody::full(data))
        .unwrap_or_else(|e| fallback(status.as_str(), &e))
}

/// Build a response without a body
pub fn build_empty_response(status: StatusCode) -> Response<ResponseBody> {
    let mut resp = Response::new(ResponseBody::empty());
    *resp.status_mut() = status;
    resp
}

/// Log response build error and degrade to an empty 500
fn fallback(kind: &str, error: &hyper::http::Error) -> Response<ResponseBody> {
    crate::logger::log_error(&format!("Failed to build {kind} response: {error}"));
    build_empty_response(StatusCode::INTERNAL_SERVER_ERROR)
}
