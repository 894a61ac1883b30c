//! Outbound email boundary.
//!
//! The library never talks to a mail provider directly; hosts wire in an
//! [`EmailDispatcher`] backed by whatever transport they use. Each logical
//! message is one dispatch call regardless of recipient count.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub recipients: Vec<String>,
    pub subject: String,
    pub message: String,
    pub sender_email: String,
    pub sender_name: String,
}

#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    /// # Errors
    ///
    /// `CoreError::StoreError` when the underlying transport rejects the
    /// request.
    async fn dispatch(&self, request: EmailRequest) -> Result<(), CoreError>;
}

#[cfg(feature = "mocks")]
pub use mock::MockEmailDispatcher;

#[cfg(feature = "mocks")]
mod mock {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, RwLock};

    use super::*;

    /// Records every dispatched request instead of sending anything.
    #[derive(Clone, Default)]
    pub struct MockEmailDispatcher {
        pub sent: Arc<RwLock<Vec<EmailRequest>>>,
        pub fail_dispatch: Arc<AtomicBool>,
    }

    impl MockEmailDispatcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn sent_count(&self) -> usize {
            self.sent.read().map(|s| s.len()).unwrap_or(0)
        }
    }

    #[async_trait]
    impl EmailDispatcher for MockEmailDispatcher {
        async fn dispatch(&self, request: EmailRequest) -> Result<(), CoreError> {
            if self.fail_dispatch.load(Ordering::SeqCst) {
                return Err(CoreError::StoreError("email transport unavailable".into()));
            }
            self.sent
                .write()
                .map_err(|_| CoreError::Internal("lock poisoned".into()))?
                .push(request);
            Ok(())
        }
    }
}

#[cfg(all(test, feature = "mocks"))]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;

    fn request() -> EmailRequest {
        EmailRequest {
            recipients: vec!["a@x.edu".to_owned(), "b@x.edu".to_owned()],
            subject: "Chapter update".to_owned(),
            message: "Meeting moved to 7pm.".to_owned(),
            sender_email: "board@x.edu".to_owned(),
            sender_name: "Beta Chapter".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let dispatcher = MockEmailDispatcher::new();
        dispatcher.dispatch(request()).await.unwrap();

        assert_eq!(dispatcher.sent_count(), 1);
        let sent = dispatcher.sent.read().unwrap();
        assert_eq!(sent[0].recipients.len(), 2);
    }

    #[tokio::test]
    async fn test_mock_failure_switch() {
        let dispatcher = MockEmailDispatcher::new();
        dispatcher.fail_dispatch.store(true, Ordering::SeqCst);

        let result = dispatcher.dispatch(request()).await;
        assert!(matches!(result, Err(CoreError::StoreError(_))));
        assert_eq!(dispatcher.sent_count(), 0);
    }
}
