use async_trait::async_trait;

use crate::events::{AppEvent, Listener};

/// Re-emits every event through `tracing`, carrying the dot-separated
/// event name as a field. Only built with the `tracing` feature.
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &AppEvent) {
        tracing::info!(
            target: "chapterhouse::events",
            event_name = event.name(),
            ?event,
            "app event"
        );
    }
}
