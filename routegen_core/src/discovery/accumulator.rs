//! Namespace prefix tracking and route flattening.
//!
//! The accumulator is a flat state machine, not a stack: a new root
//! namespace flushes everything pending and replaces the prefix, and a
//! sub-namespace only appends to it. Pending routers receive the prefix that
//! is current at flush time.

use super::pattern::Binding;
use crate::types::Route;
use tracing::trace;

/// A registered router whose routes have not been flushed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRouter {
    pub path: String,
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Default)]
pub struct RouteAccumulator {
    prefix: String,
    pending: Vec<PendingRouter>,
    routes: Vec<Route>,
}

impl RouteAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn pending(&self) -> &[PendingRouter] {
        &self.pending
    }

    /// Flushes pending routers, then starts a new prefix.
    pub fn root_namespace(&mut self, path: &str) {
        self.flush();
        self.prefix = path.to_string();
        trace!("Root namespace {:?}", self.prefix);
    }

    pub fn sub_namespace(&mut self, path: &str) {
        self.prefix.push_str(path);
        trace!("Sub namespace, prefix is now {:?}", self.prefix);
    }

    pub fn register(&mut self, router: PendingRouter) {
        trace!(
            "Router {:?} with {} bindings",
            router.path,
            router.bindings.len()
        );
        self.pending.push(router);
    }

    /// Turns every pending router into routes under the current prefix and
    /// resets to the idle state.
    pub fn flush(&mut self) {
        let prefix = std::mem::take(&mut self.prefix);
        for router in self.pending.drain(..) {
            let path_template = format!("{}{}", prefix, router.path);
            for binding in router.bindings {
                self.routes.push(Route {
                    method: binding.method,
                    path_template: path_template.clone(),
                    receiver: binding.receiver,
                    handler_name: binding.handler,
                });
            }
        }
    }

    /// Performs the final flush and returns every route in discovery order.
    pub fn finish(mut self) -> Vec<Route> {
        self.flush();
        self.routes
    }
}
