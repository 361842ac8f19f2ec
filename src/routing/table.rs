//! Prefix route table
//!
//! Routes are collected in a `RouterBuilder` and frozen into a `Router` when
//! the server starts. The frozen table is sorted by prefix length so the first
//! hit during dispatch is the longest matching prefix.

use crate::handler::Handler;
use crate::logger;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route prefix must not be empty")]
    EmptyPrefix,
    #[error("route prefix already registered: {0}")]
    DuplicatePrefix(String),
    #[error("routes cannot be registered after the server has started")]
    AlreadyStarted,
}

/// A registered prefix and the handler serving it
#[derive(Clone)]
pub struct Route {
    prefix: String,
    handler: Arc<dyn Handler>,
}

impl Route {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("prefix", &self.prefix)
            .field("handler", &self.handler.name())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct RouterBuilder {
    routes: Vec<Route>,
    frozen: bool,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `prefix`, adding a leading `/` if missing
    pub fn register(
        &mut self,
        prefix: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<&mut Self, RouteError> {
        if prefix.trim().is_empty() {
            return Err(RouteError::EmptyPrefix);
        }
        if self.frozen {
            return Err(RouteError::AlreadyStarted);
        }

        let prefix = normalize_prefix(prefix);
        if self.routes.iter().any(|r| r.prefix == prefix) {
            return Err(RouteError::DuplicatePrefix(prefix));
        }

        logger::log_route_registered(&prefix, handler.name());
        self.routes.push(Route { prefix, handler });
        Ok(self)
    }

    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Stop accepting registrations and return the immutable table
    pub fn freeze(&mut self) -> Router {
        self.frozen = true;
        let mut routes = self.routes.clone();
        // Stable sort keeps registration order among equal lengths
        routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Router {
            routes: routes.into(),
        }
    }
}

/// Immutable route table, cheap to clone and share across workers
#[derive(Debug, Clone)]
pub struct Router {
    routes: Arc<[Route]>,
}

impl Router {
    /// Find the route with the longest prefix of `path`
    pub fn dispatch(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| path.starts_with(r.prefix.as_str()))
    }

    /// Routes ordered from longest to shortest prefix
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn normalize_prefix(prefix: &str) -> String {
    if prefix.starts_with('/') {
        prefix.to_string()
    } else {
        format!("/{prefix}")
    }
}
