//! Handler error taxonomy
//!
//! Handlers pick the kind of failure and the body format; the status code and
//! the final body are derived here so every route renders errors the same way.

use super::body::ResponseBody;
use super::response;
use hyper::{Response, StatusCode};
use std::io;
use thiserror::Error;

/// What went wrong while serving a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    MethodNotAllowed,
    Internal,
}

impl ErrorKind {
    pub const fn status(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// How the error message is rendered in the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFormat {
    /// `text/plain` body carrying the message
    Text,
    /// `{"error": "<message>"}` envelope
    Json,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
    kind: ErrorKind,
    format: ErrorFormat,
    message: String,
}

impl HandlerError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            format: ErrorFormat::Text,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(ErrorKind::MethodNotAllowed, String::new())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Render this error as a JSON envelope instead of plain text
    #[must_use]
    pub const fn json(mut self) -> Self {
        self.format = ErrorFormat::Json;
        self
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub const fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Convert into the response sent to the client.
    ///
    /// 405 always has an empty body. Every other kind carries the message
    /// verbatim, including the text of the underlying I/O failure for 500.
    pub fn into_response(self) -> Response<ResponseBody> {
        let status = self.status();
        if self.kind == ErrorKind::MethodNotAllowed {
            return response::build_empty_response(status);
        }

        match self.format {
            ErrorFormat::Text => response::build_text_response(status, self.message),
            ErrorFormat::Json => {
                let envelope = serde_json::json!({ "error": self.message });
                response::build_json_error_response(status, envelope.to_string())
            }
        }
    }
}

impl From<io::Error> for HandlerError {
    fn from(err: io::Error) -> Self {
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<ResponseBody>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_status_table() {
        assert_eq!(ErrorKind::NotFound.status(), 404);
        assert_eq!(ErrorKind::BadRequest.status(), 400);
        assert_eq!(ErrorKind::MethodNotAllowed.status(), 405);
        assert_eq!(ErrorKind::Internal.status(), 500);
    }

    #[tokio::test]
    async fn test_text_error_body() {
        let resp = HandlerError::not_found("Static file not found: app.css").into_response();
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()["content-type"], "text/plain; charset=UTF-8");
        assert_eq!(body_string(resp).await, "Static file not found: app.css");
    }

    #[tokio::test]
    async fn test_json_error_envelope() {
        let resp = HandlerError::internal("disk on fire").json().into_response();
        assert_eq!(resp.status(), 500);
        assert_eq!(resp.headers()["content-type"], "application/json; charset=UTF-8");
        let value: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(value, serde_json::json!({ "error": "disk on fire" }));
    }

    #[tokio::test]
    async fn test_method_not_allowed_is_empty() {
        let resp = HandlerError::method_not_allowed().json().into_response();
        assert_eq!(resp.status(), 405);
        assert!(resp.headers().get("content-type").is_none());
        assert_eq!(body_string(resp).await, "");
    }

    #[test]
    fn test_io_error_keeps_message() {
        let err = HandlerError::from(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.message(), "access denied");
    }
}
