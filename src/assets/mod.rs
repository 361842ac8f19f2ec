//! Resource location
//!
//! Two independent strategies: the bundled asset set used by the static and
//! metadata routes, and raw filesystem paths used by the stream route.

mod bundle;
mod filesystem;

pub use bundle::AssetBundle;
pub use filesystem::{open_stream, StreamSource};
