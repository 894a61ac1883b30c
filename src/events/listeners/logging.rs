use async_trait::async_trait;

use crate::events::{AppEvent, Listener};

/// Writes every event to the `log` crate under the
/// `chapterhouse::events` target, one line per event.
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    /// INFO-level listener.
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &AppEvent) {
        log::log!(
            target: "chapterhouse::events",
            self.level,
            "event={} {:?}",
            event.name(),
            event
        );
    }
}
