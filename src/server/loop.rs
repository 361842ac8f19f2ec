// Server loop module
// Accepts connections until shutdown is requested, then drains them

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{watch, Notify};
use tokio::task::JoinSet;

use super::connection::accept_connection;
use super::AppState;
use crate::logger;

/// Accept loop settings
pub struct ServerLoopConfig {
    pub keep_alive: bool,
    pub shutdown: Arc<Notify>,
    /// How long open connections may run once shutdown starts
    pub shutdown_grace: Duration,
}

/// Run the accept loop; returns once `shutdown` is notified and the open
/// connections have finished or the grace period ran out.
///
/// The listener is closed first, so new connections are refused while the
/// accepted ones complete their current response.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    config: ServerLoopConfig,
) {
    let local_addr = listener.local_addr().ok();
    let (drain_tx, _) = watch::channel(false);
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(
                        stream,
                        peer_addr,
                        &state,
                        config.keep_alive,
                        drain_tx.subscribe(),
                        &mut connections,
                    ),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            Some(joined) = connections.join_next(), if !connections.is_empty() => {
                if let Err(e) = joined {
                    logger::log_error(&format!("Connection task failed: {e}"));
                }
            }

            () = config.shutdown.notified() => break,
        }
    }

    drop(listener);
    drain_connections(&mut connections, &drain_tx, config.shutdown_grace).await;

    if let Some(addr) = local_addr {
        logger::log_shutdown(&addr);
    }
}

/// Ask every connection to close after its current response and wait for
/// them, aborting whatever is left when `grace` expires
async fn drain_connections(
    connections: &mut JoinSet<()>,
    drain_tx: &watch::Sender<bool>,
    grace: Duration,
) {
    if connections.is_empty() {
        return;
    }

    logger::log_draining(connections.len(), grace);
    drain_tx.send_replace(true);

    let drained = tokio::time::timeout(grace, async {
        while connections.join_next().await.is_some() {}
    })
    .await;

    if drained.is_err() {
        logger::log_warning(&format!(
            "{} connection(s) still open after {}s; closing them",
            connections.len(),
            grace.as_secs()
        ));
        connections.shutdown().await;
    }
}
