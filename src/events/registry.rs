use std::sync::OnceLock;

use crate::LOG_TARGET;

use super::{AppEvent, Listener};

static REGISTRY: OnceLock<EventRegistry> = OnceLock::new();

/// The process-wide set of event listeners, populated once at startup by
/// [`register_event_listeners`].
pub struct EventRegistry {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventRegistry {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Adds a listener. Listeners run in registration order.
    pub fn listen(&mut self, listener: impl Listener) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    async fn dispatch(&self, event: &AppEvent) {
        for listener in &self.listeners {
            listener.handle(event).await;
        }
    }
}

/// Installs the event listeners for this process.
///
/// Call once during startup, before any action runs:
///
/// ```rust,ignore
/// register_event_listeners(|registry| {
///     registry.listen(LoggingListener::new());
/// });
/// ```
///
/// Without a call, every dispatched event is dropped. A second call is
/// ignored with a warning; the first registration wins.
pub fn register_event_listeners<F>(f: F)
where
    F: FnOnce(&mut EventRegistry),
{
    let mut registry = EventRegistry::new();
    f(&mut registry);
    if REGISTRY.set(registry).is_err() {
        log::warn!(
            target: LOG_TARGET,
            "msg=\"register_event_listeners called more than once, ignoring\""
        );
    }
}

/// Hands an event to every registered listener; a no-op when none are
/// registered.
pub async fn dispatch(event: AppEvent) {
    if let Some(registry) = REGISTRY.get() {
        registry.dispatch(&event).await;
    }
}
