use async_trait::async_trait;

use super::AppEvent;

/// Async handler for dispatched [`AppEvent`]s.
///
/// A listener sees every event and filters by matching on the variant, so
/// one implementation can cover audit logging, metrics, or an outbound
/// webhook without the actions knowing about any of them.
///
/// # Example
///
/// ```rust,ignore
/// struct AuditTrail { sink: AuditSink }
///
/// #[async_trait]
/// impl Listener for AuditTrail {
///     async fn handle(&self, event: &AppEvent) {
///         if let AppEvent::PermissionsChanged { org_id, member_id, .. } = event {
///             self.sink.record(*org_id, *member_id).await;
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    async fn handle(&self, event: &AppEvent);
}
