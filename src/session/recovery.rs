use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::events::{dispatch, AppEvent};

/// The password-recovery flag, raised when the auth provider emits its
/// recovery event and consumed when the reset form completes.
///
/// Initialization order contract: construct the signal and attach it to the
/// provider's event subscription **before the view tree is built**, because
/// the recovery event can fire during provider initialization, before
/// routing exists. The signal is then injected wherever it is read (session store,
/// sign-in action, guard); it is deliberately not a free-standing module
/// global.
///
/// Handles are cheap clones sharing one flag.
#[derive(Debug, Clone, Default)]
pub struct RecoverySignal {
    pending: Arc<AtomicBool>,
}

impl RecoverySignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raised by the provider's recovery event listener; the email comes
    /// from the provider event.
    pub async fn trigger(&self, email: &str) {
        self.pending.store(true, Ordering::SeqCst);
        dispatch(AppEvent::RecoveryRequested {
            email: email.to_owned(),
            at: Utc::now(),
        })
        .await;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.pending.store(false, Ordering::SeqCst);
    }

    /// Clears the flag and returns whether it was set. Completing the reset
    /// form uses this so the recovery gate cannot be reopened by navigating
    /// back.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_cleared() {
        assert!(!RecoverySignal::new().is_pending());
    }

    #[tokio::test]
    async fn test_trigger_and_take() {
        let signal = RecoverySignal::new();
        signal.trigger("member@x.edu").await;
        assert!(signal.is_pending());

        assert!(signal.take());
        assert!(!signal.is_pending());
        // second take sees nothing; the gate stays closed
        assert!(!signal.take());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let signal = RecoverySignal::new();
        let listener_handle = signal.clone();

        listener_handle.trigger("member@x.edu").await;
        assert!(signal.is_pending());

        signal.clear();
        assert!(!listener_handle.is_pending());
    }
}
