use async_trait::async_trait;

use crate::branding::OrgBranding;
use crate::crypto::SecretString;
use crate::CoreError;

use super::Identity;

/// The hosted authentication provider boundary.
///
/// The provider owns credentials, persisted sessions, and invite/recovery
/// links; this crate only consumes it. Implementations must register their
/// password-recovery event subscription (which raises a
/// [`RecoverySignal`](super::RecoverySignal)) before any UI is built, since
/// the event can fire during provider initialization.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Signs in with email/password and returns the identity.
    ///
    /// # Errors
    ///
    /// `CoreError::InvalidCredentials` for a rejected sign-in.
    async fn sign_in(&self, email: &str, password: &SecretString)
        -> Result<Identity, CoreError>;

    /// Ends the provider-side session.
    async fn sign_out(&self) -> Result<(), CoreError>;

    /// The identity of the persisted session, if any.
    async fn current_identity(&self) -> Result<Option<Identity>, CoreError>;

    /// Replaces the current identity's password.
    async fn update_password(&self, new_password: &SecretString) -> Result<(), CoreError>;

    /// Writes organization branding into the identity's profile metadata
    /// for use in transactional emails.
    async fn set_branding_metadata(&self, branding: &OrgBranding) -> Result<(), CoreError>;
}

#[cfg(feature = "mocks")]
pub use mock::MockAuthProvider;

#[cfg(feature = "mocks")]
mod mock {
    #![allow(clippy::significant_drop_tightening)]

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, RwLock};

    use super::*;

    /// In-memory auth provider for tests.
    ///
    /// Seed accounts with [`register`](MockAuthProvider::register); flip the
    /// failure switches to exercise the fail-closed paths.
    #[derive(Clone, Default)]
    pub struct MockAuthProvider {
        accounts: Arc<RwLock<HashMap<String, (Identity, String)>>>,
        current: Arc<RwLock<Option<Identity>>>,
        pub branding: Arc<RwLock<Option<OrgBranding>>>,
        pub fail_sign_out: Arc<AtomicBool>,
        pub fail_session_check: Arc<AtomicBool>,
        pub fail_password_update: Arc<AtomicBool>,
        pub fail_branding: Arc<AtomicBool>,
        pub sign_out_calls: Arc<RwLock<u32>>,
    }

    impl MockAuthProvider {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds an account and returns its identity.
        pub fn register(&self, id: &str, email: &str, password: &str) -> Identity {
            let identity = Identity::new(id, email);
            self.accounts.write().unwrap().insert(
                email.to_lowercase(),
                (identity.clone(), password.to_owned()),
            );
            identity
        }

        /// Marks an identity as the persisted session without credentials,
        /// as if a one-time link had been followed.
        pub fn force_session(&self, identity: Identity) {
            *self.current.write().unwrap() = Some(identity);
        }

        pub fn password_of(&self, email: &str) -> Option<String> {
            self.accounts
                .read()
                .unwrap()
                .get(&email.to_lowercase())
                .map(|(_, p)| p.clone())
        }
    }

    #[async_trait]
    impl AuthProvider for MockAuthProvider {
        async fn sign_in(
            &self,
            email: &str,
            password: &SecretString,
        ) -> Result<Identity, CoreError> {
            let accounts = self.accounts.read().unwrap();
            match accounts.get(&email.to_lowercase()) {
                Some((identity, stored)) if stored == password.expose_secret() => {
                    let identity = identity.clone();
                    drop(accounts);
                    *self.current.write().unwrap() = Some(identity.clone());
                    Ok(identity)
                }
                _ => Err(CoreError::InvalidCredentials),
            }
        }

        async fn sign_out(&self) -> Result<(), CoreError> {
            *self.sign_out_calls.write().unwrap() += 1;
            if self.fail_sign_out.load(Ordering::SeqCst) {
                return Err(CoreError::Internal("network timeout".into()));
            }
            *self.current.write().unwrap() = None;
            Ok(())
        }

        async fn current_identity(&self) -> Result<Option<Identity>, CoreError> {
            if self.fail_session_check.load(Ordering::SeqCst) {
                return Err(CoreError::Internal("session check failed".into()));
            }
            Ok(self.current.read().unwrap().clone())
        }

        async fn update_password(&self, new_password: &SecretString) -> Result<(), CoreError> {
            if self.fail_password_update.load(Ordering::SeqCst) {
                return Err(CoreError::Internal("password update rejected".into()));
            }
            let current = self.current.read().unwrap().clone();
            let identity = current.ok_or(CoreError::Unauthenticated)?;
            let mut accounts = self.accounts.write().unwrap();
            accounts.insert(
                identity.email.to_lowercase(),
                (identity, new_password.expose_secret().to_owned()),
            );
            Ok(())
        }

        async fn set_branding_metadata(&self, branding: &OrgBranding) -> Result<(), CoreError> {
            if self.fail_branding.load(Ordering::SeqCst) {
                return Err(CoreError::Internal("metadata write rejected".into()));
            }
            *self.branding.write().unwrap() = Some(branding.clone());
            Ok(())
        }
    }
}
