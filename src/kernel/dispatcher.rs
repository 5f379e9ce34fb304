//! Event Dispatcher
//!
//! Registry of terminate listeners ordered by priority.

use std::sync::Arc;

use tracing::debug;

use crate::kernel::{Bundle, TerminateEvent};

/// Listener invoked when a request terminates.
///
/// Listeners must not fail: anything they do is best-effort teardown.
pub trait TerminateListener: Send + Sync {
    /// Name used in logs and listings.
    fn name(&self) -> &'static str;

    fn on_terminate(&self, event: &TerminateEvent);
}

struct Registration {
    priority: i32,
    listener: Arc<dyn TerminateListener>,
}

// == Event Dispatcher ==
/// Calls terminate listeners from highest to lowest priority. Listeners with
/// equal priority run in registration order.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Registration>,
    bundles: Vec<&'static str>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener at the given priority.
    pub fn add_listener(&mut self, listener: Arc<dyn TerminateListener>, priority: i32) {
        // Insert after every registration of equal or higher priority
        let position = self
            .listeners
            .iter()
            .position(|r| r.priority < priority)
            .unwrap_or(self.listeners.len());
        debug!(
            "Registered terminate listener {} at priority {}",
            listener.name(),
            priority
        );
        self.listeners
            .insert(position, Registration { priority, listener });
    }

    /// Lets a bundle register its listeners and records its alias.
    pub fn register_bundle(&mut self, bundle: &dyn Bundle) {
        bundle.build(self);
        self.bundles.push(bundle.alias());
    }

    /// Whether a bundle with this alias has been registered.
    pub fn has_bundle(&self, alias: &str) -> bool {
        self.bundles.iter().any(|b| *b == alias)
    }

    /// Registered listeners as `(name, priority)`, in dispatch order.
    pub fn listeners(&self) -> Vec<(&'static str, i32)> {
        self.listeners
            .iter()
            .map(|r| (r.listener.name(), r.priority))
            .collect()
    }

    /// Runs every listener against the event.
    pub fn dispatch_terminate(&self, event: &TerminateEvent) {
        for registration in &self.listeners {
            registration.listener.on_terminate(event);
        }
    }
}
