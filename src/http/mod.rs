//! HTTP protocol layer module
//!
//! Response bodies, builders, the error taxonomy and MIME detection. Nothing
//! in here knows about routes or handlers.

pub mod body;
pub mod error;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::{FileChunks, ResponseBody, STREAM_CHUNK_SIZE};
pub use error::{ErrorFormat, ErrorKind, HandlerError};
pub use mime::content_type_for;
