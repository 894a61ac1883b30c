//! The authenticated-identity lifecycle: the auth-provider boundary, the
//! session store that is the UI's source of truth for "who is asking", and
//! the recovery signal raised by the provider's password-reset event.

mod provider;
mod recovery;
mod store;

pub use provider::AuthProvider;
pub use recovery::RecoverySignal;
pub use store::SessionStore;

#[cfg(feature = "mocks")]
pub use provider::MockAuthProvider;

use serde::{Deserialize, Serialize};

/// The authenticated identity as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The provider's opaque identity id; profiles are keyed by it.
    pub id: String,
    pub email: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}
