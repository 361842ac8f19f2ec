//! Routing module
//!
//! Longest-prefix route table built before the server starts and read-only
//! afterwards.

mod table;

pub use table::{Route, RouteError, Router, RouterBuilder};
