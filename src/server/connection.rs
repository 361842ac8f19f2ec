// Connection module
// Serves one accepted TCP connection on its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinSet;

use super::AppState;
use crate::handler;
use crate::logger;

/// Accept a connection and hand it to a worker task tracked in `connections`
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    keep_alive: bool,
    draining: watch::Receiver<bool>,
    connections: &mut JoinSet<()>,
) {
    if state.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    connections.spawn(handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        keep_alive,
        draining,
    ));
}

/// Serve HTTP/1.1 on `stream` until the client or hyper closes it.
///
/// Requests on one connection are handled in order; separate connections
/// run in parallel on the runtime's worker threads. Once `draining` changes
/// the response in flight is completed and the connection is closed.
async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    keep_alive: bool,
    mut draining: watch::Receiver<bool>,
) {
    let io = TokioIo::new(stream);

    let mut builder = http1::Builder::new();
    builder.keep_alive(keep_alive);

    let conn = builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
    );
    tokio::pin!(conn);

    let mut closing = false;
    let result = loop {
        tokio::select! {
            result = conn.as_mut() => break result,
            _ = draining.changed(), if !closing => {
                closing = true;
                conn.as_mut().graceful_shutdown();
            }
        }
    };

    if let Err(err) = result {
        logger::log_connection_error(&err);
    }
}
