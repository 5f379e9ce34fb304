//! Kernel Module
//!
//! Request lifecycle hooks: the terminate event, a priority-ordered listener
//! registry and the bundle that wires upload cleanup into it.

mod bundle;
mod dispatcher;
mod event;

pub use bundle::{Bundle, RequestFileCleanBundle, RequestFileCleanListener};
pub use dispatcher::{EventDispatcher, TerminateListener};
pub use event::TerminateEvent;
