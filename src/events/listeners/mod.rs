//! Built-in listeners: one for the `log` crate, one for `tracing`.
//!
//! Register them with
//! [`register_event_listeners`](crate::register_event_listeners); hosts with
//! their own audit pipeline implement [`Listener`](super::Listener) instead.

mod logging;
#[cfg(feature = "tracing")]
mod tracing;

pub use logging::LoggingListener;
#[cfg(feature = "tracing")]
pub use self::tracing::TracingListener;
