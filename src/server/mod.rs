// Server module entry point
// Server lifecycle, connection acceptance and shutdown

pub mod connection;
mod instance;
pub mod listener;
pub mod signal;
mod state;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

pub use instance::{Server, ServerHandle, StartError};
pub use listener::create_listener;
pub use server_loop::{start_server_loop, ServerLoopConfig};
pub use state::AppState;
