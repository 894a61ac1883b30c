//! Domain events fired by the actions.
//!
//! Actions dispatch an [`AppEvent`] after each notable outcome (sign-in,
//! invite, permission edit, outbound communication). Dispatch is a no-op
//! until [`register_event_listeners`] installs listeners at startup, so the
//! core never depends on an audit pipeline being present.
//!
//! ```rust,ignore
//! use chapterhouse::register_event_listeners;
//! use chapterhouse::events::listeners::LoggingListener;
//!
//! register_event_listeners(|registry| {
//!     registry.listen(LoggingListener::new());
//! });
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::AppEvent;
pub use listener::Listener;
pub use registry::{dispatch, register_event_listeners};
