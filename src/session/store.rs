use std::sync::{Arc, RwLock};

use chrono::Utc;

use crate::crypto::SecretString;
use crate::events::{dispatch, AppEvent};
use crate::{CoreError, LOG_TARGET};

use super::provider::AuthProvider;
use super::recovery::RecoverySignal;
use super::Identity;

struct SessionState {
    identity: Option<Identity>,
    loading: bool,
}

struct Inner<A: AuthProvider> {
    provider: A,
    recovery: RecoverySignal,
    state: RwLock<SessionState>,
}

/// Holds the current authenticated identity and its lifecycle.
///
/// Local state is the UI's source of truth: a failed provider check reads
/// as "no identity" (fail closed), and sign-out clears local state before
/// the provider call, and regardless of it. Handles are cheap clones sharing
/// one state.
pub struct SessionStore<A: AuthProvider> {
    inner: Arc<Inner<A>>,
}

impl<A: AuthProvider> Clone for SessionStore<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: AuthProvider> SessionStore<A> {
    /// The recovery signal must already be attached to the provider's event
    /// subscription; see [`RecoverySignal`] for the initialization order
    /// contract.
    pub fn new(provider: A, recovery: RecoverySignal) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                recovery,
                state: RwLock::new(SessionState {
                    identity: None,
                    loading: true,
                }),
            }),
        }
    }

    /// Re-reads the persisted session from the provider (page reload).
    ///
    /// Any provider failure is treated as signed-out; access is never
    /// granted on an unverifiable session.
    pub async fn refresh(&self) -> Option<Identity> {
        self.set_loading(true);

        let identity = match self.inner.provider.current_identity().await {
            Ok(identity) => identity,
            Err(e) => {
                log::warn!(
                    target: LOG_TARGET,
                    "msg=\"session check failed, treating as signed out\", error=\"{e}\""
                );
                None
            }
        };

        if let Ok(mut state) = self.inner.state.write() {
            state.identity = identity.clone();
            state.loading = false;
        }
        identity
    }

    /// Signs in through the provider and caches the identity locally.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, CoreError> {
        let identity = self.inner.provider.sign_in(email, password).await?;
        if let Ok(mut state) = self.inner.state.write() {
            state.identity = Some(identity.clone());
            state.loading = false;
        }
        Ok(identity)
    }

    /// Clears the local identity, then tells the provider.
    ///
    /// Always succeeds locally: a failed or timed-out provider call is
    /// logged, not surfaced, and a second call when already signed out is a
    /// no-op.
    pub async fn sign_out(&self) {
        let taken = match self.inner.state.write() {
            Ok(mut state) => {
                let taken = state.identity.take();
                state.loading = false;
                taken
            }
            Err(_) => None,
        };

        let Some(identity) = taken else {
            return;
        };

        if let Err(e) = self.inner.provider.sign_out().await {
            log::warn!(
                target: LOG_TARGET,
                "msg=\"provider sign-out failed, local session already cleared\", error=\"{e}\""
            );
        } else {
            log::info!(target: LOG_TARGET, "msg=\"signed out\"");
        }

        dispatch(AppEvent::SignOut {
            email: identity.email,
            at: Utc::now(),
        })
        .await;
    }

    /// The locally cached identity.
    pub fn identity(&self) -> Option<Identity> {
        self.inner
            .state
            .read()
            .ok()
            .and_then(|s| s.identity.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.read().map(|s| s.loading).unwrap_or(false)
    }

    pub fn recovery(&self) -> &RecoverySignal {
        &self.inner.recovery
    }

    pub fn provider(&self) -> &A {
        &self.inner.provider
    }

    fn set_loading(&self, loading: bool) {
        if let Ok(mut state) = self.inner.state.write() {
            state.loading = loading;
        }
    }
}
