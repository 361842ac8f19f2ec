// Server instance module
// Owns the route table until start, then the running accept loop

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use super::listener::create_listener;
use super::server_loop::{start_server_loop, ServerLoopConfig};
use super::AppState;
use crate::config::Config;
use crate::handler::Handler;
use crate::logger;
use crate::routing::{RouteError, RouterBuilder};

#[derive(Debug, Error)]
pub enum StartError {
    #[error("server is already started")]
    AlreadyStarted,
    #[error("{0}")]
    InvalidAddress(String),
    #[error("failed to bind listener: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server with a prefix route table.
///
/// Routes are registered before `start`; the table is frozen when the server
/// starts and later registrations fail.
#[derive(Debug)]
pub struct Server {
    config: Config,
    routes: RouterBuilder,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            routes: RouterBuilder::new(),
        }
    }

    /// Register `handler` for every path starting with `prefix`
    pub fn register(
        &mut self,
        prefix: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<&mut Self, RouteError> {
        self.routes.register(prefix, handler)?;
        Ok(self)
    }

    pub const fn is_started(&self) -> bool {
        self.routes.is_frozen()
    }

    /// Bind the listener and start accepting connections.
    ///
    /// Must be called from within a Tokio runtime. If binding fails the
    /// server stays unstarted and routes can still be added.
    pub fn start(&mut self) -> Result<ServerHandle, StartError> {
        if self.is_started() {
            return Err(StartError::AlreadyStarted);
        }

        let addr = self.config.socket_addr().map_err(StartError::InvalidAddress)?;
        let listener = create_listener(addr)?;
        let local_addr = listener.local_addr()?;

        let router = self.routes.freeze();
        if router.is_empty() {
            logger::log_warning("No routes registered; every request will get 404");
        }
        logger::log_server_start(&local_addr, &self.config, &router);

        let state = Arc::new(AppState::new(router, self.config.logging.clone()));
        let shutdown = Arc::new(Notify::new());
        let loop_config = ServerLoopConfig {
            keep_alive: self.config.performance.keep_alive,
            shutdown: Arc::clone(&shutdown),
            shutdown_grace: self.config.shutdown_grace(),
        };
        let task = tokio::spawn(start_server_loop(listener, state, loop_config));

        Ok(ServerHandle {
            local_addr,
            shutdown,
            task,
        })
    }
}

/// Handle to a running server
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the listener is bound to
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for open ones to finish.
    ///
    /// Each accepted connection completes the response it is sending and is
    /// then closed. Connections still open after `server.shutdown_timeout`
    /// seconds are aborted.
    pub async fn shutdown(self) {
        self.shutdown.notify_one();
        if let Err(e) = self.task.await {
            logger::log_error(&format!("Server loop terminated abnormally: {e}"));
        }
    }
}
