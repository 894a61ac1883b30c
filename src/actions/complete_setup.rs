use chrono::Utc;

use crate::branding::OrgBranding;
use crate::config::CoreConfig;
use crate::crypto::SecretString;
use crate::events::{dispatch, AppEvent};
use crate::repository::{Member, MemberStatus, MemberUpdate, Organization, UpsertProfile};
use crate::session::{AuthProvider, Identity};
use crate::tenant::TenantScope;
use crate::validators::{validate_name, validate_password_with};
use crate::{CoreError, MemberRepository, ProfileRepository, LOG_TARGET};

/// Input for first-time account setup at the invite gate.
#[derive(Debug)]
pub struct CompleteSetupInput {
    pub full_name: String,
    pub password: SecretString,
}

/// Action to finish first-time setup for an invited member.
///
/// This action:
/// 1. Validates the chosen name and password
/// 2. Sets the real password with the auth provider
/// 3. Moves the roster entry from `Pending` to `Active` and records the name
/// 4. Writes the profile row with setup marked complete
/// 5. Stamps organization branding onto the identity's metadata
///
/// The branding write is best-effort: a failure is logged and setup still
/// completes, since branding only affects email cosmetics.
pub struct CompleteSetupAction<A, M, P>
where
    A: AuthProvider,
    M: MemberRepository,
    P: ProfileRepository,
{
    provider: A,
    members: M,
    profiles: P,
    config: CoreConfig,
}

impl<A, M, P> CompleteSetupAction<A, M, P>
where
    A: AuthProvider,
    M: MemberRepository,
    P: ProfileRepository,
{
    pub fn new(provider: A, members: M, profiles: P) -> Self {
        Self {
            provider,
            members,
            profiles,
            config: CoreConfig::default(),
        }
    }

    pub fn with_config(provider: A, members: M, profiles: P, config: CoreConfig) -> Self {
        Self {
            provider,
            members,
            profiles,
            config,
        }
    }

    /// # Errors
    ///
    /// - `CoreError::Validation(_)` - name or password rejected
    /// - `CoreError::MemberNotFound` - no roster entry for this identity
    /// - `Err(_)` - provider or data store errors; the gate stays up
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "complete_setup", skip_all, err)
    )]
    pub async fn execute(
        &self,
        identity: &Identity,
        scope: TenantScope,
        organization: &Organization,
        input: CompleteSetupInput,
    ) -> Result<Member, CoreError> {
        validate_name(&input.full_name)?;
        validate_password_with(input.password.expose_secret(), self.config.password)?;

        // password first: if this fails the member stays Pending and the
        // gate is shown again on the next load
        self.provider.update_password(&input.password).await?;

        let member = self
            .members
            .find_by_org_and_email(scope.org_id(), &identity.email)
            .await?
            .ok_or(CoreError::MemberNotFound)?;

        self.members
            .update(
                member.id,
                MemberUpdate {
                    full_name: Some(input.full_name.clone()),
                    ..Default::default()
                },
            )
            .await?;
        self.members
            .update_status(member.id, MemberStatus::Active)
            .await?;
        // removal later uses this link to revoke the profile row
        let member = self.members.link_identity(member.id, &identity.id).await?;

        self.profiles
            .upsert(UpsertProfile {
                identity_id: identity.id.clone(),
                org_id: scope.org_id(),
                full_name: input.full_name,
                role: member.role.clone(),
                setup_complete: true,
            })
            .await?;

        let branding = OrgBranding::derive(&organization.name);
        if let Err(e) = self.provider.set_branding_metadata(&branding).await {
            log::warn!(
                target: LOG_TARGET,
                "msg=\"branding metadata write failed, setup still complete\", org_id={}, error=\"{e}\"",
                scope.org_id()
            );
        }

        log::info!(
            target: LOG_TARGET,
            "msg=\"member activated\", org_id={}, member_id={}",
            scope.org_id(),
            member.id
        );

        dispatch(AppEvent::MemberActivated {
            org_id: scope.org_id(),
            member_id: member.id,
            at: Utc::now(),
        })
        .await;

        Ok(member)
    }
}
