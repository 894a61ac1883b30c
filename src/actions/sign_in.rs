use chrono::Utc;

use crate::activation::ActivationState;
use crate::crypto::SecretString;
use crate::events::{dispatch, AppEvent};
use crate::repository::{Member, Organization, Profile};
use crate::session::{AuthProvider, SessionStore};
use crate::tenant::{TenantResolver, TenantScope};
use crate::{CoreError, MemberRepository, OrganizationRepository, ProfileRepository, LOG_TARGET};

/// Everything the application shell needs after a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignInOutcome {
    pub scope: TenantScope,
    pub organization: Organization,
    pub profile: Profile,
    pub member: Member,
    /// Which gate, if any, to present before the dashboard.
    pub activation: ActivationState,
}

/// Action to sign a user in and resolve their tenant context.
///
/// This action:
/// 1. Authenticates against the provider and caches the session locally
/// 2. Resolves the tenant from the profile row (suspension blocks here)
/// 3. Loads the caller's roster entry; no entry means access was revoked
/// 4. Refreshes the profile's cached role from the roster
/// 5. Computes the activation state for the gate chain
///
/// Any failure after authentication signs the local session back out, so a
/// revoked or suspended account never holds a live session.
pub struct SignInAction<A, P, O, M>
where
    A: AuthProvider,
    P: ProfileRepository,
    O: OrganizationRepository,
    M: MemberRepository,
{
    session: SessionStore<A>,
    resolver: TenantResolver<P, O>,
    members: M,
}

impl<A, P, O, M> SignInAction<A, P, O, M>
where
    A: AuthProvider,
    P: ProfileRepository,
    O: OrganizationRepository,
    M: MemberRepository,
{
    pub fn new(session: SessionStore<A>, resolver: TenantResolver<P, O>, members: M) -> Self {
        Self {
            session,
            resolver,
            members,
        }
    }

    /// # Errors
    ///
    /// - `CoreError::InvalidCredentials` - provider rejected the pair
    /// - `CoreError::TenantUnresolved` - no profile row for the identity
    /// - `CoreError::OrganizationSuspended` - the tenant is suspended
    /// - `CoreError::MemberNotFound` - roster entry was removed
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "sign_in", skip_all, err)
    )]
    pub async fn execute(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SignInOutcome, CoreError> {
        let identity = match self.session.sign_in(email, password).await {
            Ok(identity) => identity,
            Err(e) => {
                dispatch(AppEvent::SignInFailed {
                    email: email.to_owned(),
                    reason: e.to_string(),
                    at: Utc::now(),
                })
                .await;
                return Err(e);
            }
        };

        let resolved = match self.resolver.resolve_full(&identity).await {
            Ok(resolved) => resolved,
            Err(e) => {
                self.session.sign_out().await;
                return Err(e);
            }
        };

        let member = match self
            .members
            .find_by_org_and_email(resolved.scope.org_id(), &identity.email)
            .await?
        {
            Some(member) => member,
            None => {
                // a deleted roster row is a revocation
                self.session.sign_out().await;
                return Err(CoreError::MemberNotFound);
            }
        };

        // the profile's role is a read-through cache of the roster's
        let profile = if resolved.profile.role == member.role {
            resolved.profile
        } else {
            self.resolver
                .profiles()
                .set_role(&identity.id, &member.role)
                .await?
        };

        let activation = ActivationState::compute(
            member.status,
            profile.setup_complete,
            self.session.recovery().is_pending(),
        );

        log::info!(
            target: LOG_TARGET,
            "msg=\"signed in\", org_id={}, member_id={}, activation=\"{}\"",
            resolved.scope.org_id(),
            member.id,
            activation
        );

        dispatch(AppEvent::SignInSuccess {
            org_id: resolved.scope.org_id(),
            email: identity.email.clone(),
            at: Utc::now(),
        })
        .await;

        Ok(SignInOutcome {
            scope: resolved.scope,
            organization: resolved.organization,
            profile,
            member,
            activation,
        })
    }
}
