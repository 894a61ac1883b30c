use crate::config::CoreConfig;
use crate::crypto::SecretString;
use crate::repository::Profile;
use crate::session::{AuthProvider, Identity};
use crate::validators::validate_password_with;
use crate::{CoreError, ProfileRepository, LOG_TARGET};

/// Action behind the non-dismissible "secure your account" gate.
///
/// Shown to members whose roster entry is `Active` but whose profile never
/// recorded a completed setup (accounts migrated in with placeholder
/// credentials). Sets a real password and flips the setup flag; the flag is
/// only written after the password change succeeds.
pub struct SecureAccountAction<A: AuthProvider, P: ProfileRepository> {
    provider: A,
    profiles: P,
    config: CoreConfig,
}

impl<A: AuthProvider, P: ProfileRepository> SecureAccountAction<A, P> {
    pub fn new(provider: A, profiles: P) -> Self {
        Self {
            provider,
            profiles,
            config: CoreConfig::default(),
        }
    }

    pub fn with_config(provider: A, profiles: P, config: CoreConfig) -> Self {
        Self {
            provider,
            profiles,
            config,
        }
    }

    /// # Errors
    ///
    /// - `CoreError::Validation(_)` - password rejected
    /// - `CoreError::ProfileNotFound` - no profile row to flag
    /// - `Err(_)` - provider failure; the gate stays up
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "secure_account", skip_all, err)
    )]
    pub async fn execute(
        &self,
        identity: &Identity,
        new_password: &SecretString,
    ) -> Result<Profile, CoreError> {
        validate_password_with(new_password.expose_secret(), self.config.password)?;

        self.provider.update_password(new_password).await?;

        let profile = self
            .profiles
            .set_setup_complete(&identity.id, true)
            .await?;

        log::info!(
            target: LOG_TARGET,
            "msg=\"account secured\", org_id={}",
            profile.org_id
        );

        Ok(profile)
    }
}

#[cfg(all(test, feature = "mocks"))]
mod tests {
    use super::*;
    use crate::repository::{MockProfileRepository, UpsertProfile};
    use crate::session::MockAuthProvider;
    use std::sync::atomic::Ordering;

    async fn seed_profile(profiles: &MockProfileRepository) {
        profiles
            .upsert(UpsertProfile {
                identity_id: "uid-1".to_owned(),
                org_id: 1,
                full_name: "Jordan Li".to_owned(),
                role: "member".to_owned(),
                setup_complete: false,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_secure_account_flips_flag() {
        let provider = MockAuthProvider::new();
        let identity = provider.register("uid-1", "jordan@x.edu", "placeholder");
        provider.force_session(identity.clone());

        let profiles = MockProfileRepository::new();
        seed_profile(&profiles).await;

        let action = SecureAccountAction::new(provider.clone(), profiles);
        let profile = action
            .execute(&identity, &SecretString::new("a-real-password"))
            .await
            .unwrap();

        assert!(profile.setup_complete);
        assert_eq!(
            provider.password_of("jordan@x.edu").as_deref(),
            Some("a-real-password")
        );
    }

    #[tokio::test]
    async fn test_flag_not_written_when_password_fails() {
        let provider = MockAuthProvider::new();
        let identity = provider.register("uid-1", "jordan@x.edu", "placeholder");
        provider.force_session(identity.clone());
        provider.fail_password_update.store(true, Ordering::SeqCst);

        let profiles = MockProfileRepository::new();
        seed_profile(&profiles).await;

        let action = SecureAccountAction::new(provider, profiles.clone());
        let result = action
            .execute(&identity, &SecretString::new("a-real-password"))
            .await;

        assert!(result.is_err());
        let stored = profiles.find_by_identity("uid-1").await.unwrap().unwrap();
        assert!(!stored.setup_complete);
    }
}
