//! Per-page entry decisions.
//!
//! Every page load funnels through [`PageGuard::enter`], which runs the
//! whole chain in order: session, tenant, roster membership, activation
//! gates, then the permission matrix. The first failing step decides the
//! [`Denial`]; data fetches for a page must not start until `enter` returns
//! a [`PageContext`].

use crate::activation::ActivationState;
use crate::config::CoreConfig;
use crate::rbac::{evaluate, CrudAction, Page};
use crate::repository::{Member, MemberStatus, Organization, Profile};
use crate::session::{AuthProvider, Identity, SessionStore};
use crate::tenant::{TenantResolver, TenantScope};
use crate::{CoreError, MemberRepository, OrganizationRepository, ProfileRepository, LOG_TARGET};

/// Why a page may not be shown, and where to send the user instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Denial {
    /// No usable session; go to sign-in.
    SignIn,
    /// Signed in but the matrix denies reading this page; go to the
    /// landing page and show the notice.
    Landing { notice: String },
    /// An activation gate blocks all pages until resolved.
    Gate(ActivationState),
    /// Tenant or roster data could not be loaded; show an error state
    /// rather than guessing at access.
    Stalled(CoreError),
}

/// Everything a page needs once entry is granted.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub identity: Identity,
    pub scope: TenantScope,
    pub organization: Organization,
    pub profile: Profile,
    pub member: Member,
}

/// Gatekeeper for page entry.
pub struct PageGuard<A, P, O, M>
where
    A: AuthProvider,
    P: ProfileRepository,
    O: OrganizationRepository,
    M: MemberRepository,
{
    session: SessionStore<A>,
    resolver: TenantResolver<P, O>,
    members: M,
    config: CoreConfig,
}

impl<A, P, O, M> PageGuard<A, P, O, M>
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
            config: CoreConfig::default(),
        }
    }

    pub fn with_config(
        session: SessionStore<A>,
        resolver: TenantResolver<P, O>,
        members: M,
        config: CoreConfig,
    ) -> Self {
        Self {
            session,
            resolver,
            members,
            config,
        }
    }

    /// Routing key of the page a [`Denial::Landing`] should land on.
    pub fn landing_page(&self) -> &'static str {
        self.config.default_landing
    }

    /// Decides whether the given page may be shown right now.
    ///
    /// A suspended organization, a missing or revoked profile, or a
    /// missing or inactive roster entry also ends the local session: all
    /// of them mean the account has no standing here anymore.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "enter_page", skip(self))
    )]
    pub async fn enter(&self, page: Page) -> Result<PageContext, Denial> {
        let Some(identity) = self.session.refresh().await else {
            return Err(Denial::SignIn);
        };

        let resolved = match self.resolver.resolve_full(&identity).await {
            Ok(resolved) => resolved,
            // no profile or a suspended org: the account has no standing
            // here anymore, end the local session
            Err(CoreError::TenantUnresolved | CoreError::OrganizationSuspended) => {
                self.session.sign_out().await;
                return Err(Denial::SignIn);
            }
            Err(e) => return Err(Denial::Stalled(e)),
        };

        let member = match self
            .members
            .find_by_org_and_email(resolved.scope.org_id(), &identity.email)
            .await
        {
            Ok(Some(member)) => member,
            Ok(None) => {
                // removed from the roster: revoked
                self.session.sign_out().await;
                return Err(Denial::SignIn);
            }
            Err(e) => return Err(Denial::Stalled(e)),
        };

        // a soft-removed entry has no standing either
        if member.status == MemberStatus::Inactive {
            self.session.sign_out().await;
            return Err(Denial::SignIn);
        }

        let activation = ActivationState::compute(
            member.status,
            resolved.profile.setup_complete,
            self.session.recovery().is_pending(),
        );
        if !activation.is_ready() {
            return Err(Denial::Gate(activation));
        }

        if !evaluate(&member.role, &member.matrix, page, CrudAction::Read) {
            log::info!(
                target: LOG_TARGET,
                "msg=\"page read denied\", org_id={}, member_id={}, page=\"{page}\"",
                resolved.scope.org_id(),
                member.id
            );
            return Err(Denial::Landing {
                notice: format!("You don't have access to the {page} page."),
            });
        }

        Ok(PageContext {
            identity,
            scope: resolved.scope,
            organization: resolved.organization,
            profile: resolved.profile,
            member,
        })
    }
}
