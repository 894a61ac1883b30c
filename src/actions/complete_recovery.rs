use chrono::Utc;

use crate::config::CoreConfig;
use crate::crypto::SecretString;
use crate::events::{dispatch, AppEvent};
use crate::session::{AuthProvider, Identity, RecoverySignal};
use crate::validators::validate_password_with;
use crate::{CoreError, LOG_TARGET};

/// Action to finish a password recovery.
///
/// The provider has already authenticated the user through the one-time
/// recovery link; this sets the replacement password and clears the pending
/// recovery signal, so the gate does not reappear on later loads of the same
/// session. The signal is cleared only on success.
pub struct CompleteRecoveryAction<A: AuthProvider> {
    provider: A,
    recovery: RecoverySignal,
    config: CoreConfig,
}

impl<A: AuthProvider> CompleteRecoveryAction<A> {
    pub fn new(provider: A, recovery: RecoverySignal) -> Self {
        Self {
            provider,
            recovery,
            config: CoreConfig::default(),
        }
    }

    pub fn with_config(provider: A, recovery: RecoverySignal, config: CoreConfig) -> Self {
        Self {
            provider,
            recovery,
            config,
        }
    }

    /// # Errors
    ///
    /// - `CoreError::Validation(_)` - password rejected
    /// - `Err(_)` - provider failure; the recovery gate stays up
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "complete_recovery", skip_all, err)
    )]
    pub async fn execute(
        &self,
        identity: &Identity,
        new_password: &SecretString,
    ) -> Result<(), CoreError> {
        validate_password_with(new_password.expose_secret(), self.config.password)?;

        self.provider.update_password(new_password).await?;
        self.recovery.clear();

        log::info!(
            target: LOG_TARGET,
            "msg=\"recovery completed\", email=\"{}\"",
            identity.email
        );

        dispatch(AppEvent::RecoveryCompleted {
            email: identity.email.clone(),
            at: Utc::now(),
        })
        .await;

        Ok(())
    }
}
