//! Tenant resolution: mapping an authenticated identity to exactly one
//! organization.
//!
//! A [`TenantScope`] is the only form in which gateways and actions receive
//! a tenant id, and the resolver is its only public source. Callers can
//! never substitute a tenant id of their own choosing.

use crate::repository::{Organization, OrganizationRepository, Profile, ProfileRepository};
use crate::session::Identity;
use crate::{CoreError, LOG_TARGET};

/// The resolved tenant id, issued by [`TenantResolver`] only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantScope {
    org_id: i64,
}

impl TenantScope {
    pub(crate) fn new(org_id: i64) -> Self {
        Self { org_id }
    }

    pub fn org_id(self) -> i64 {
        self.org_id
    }
}

/// Everything resolution produces in one round of lookups.
#[derive(Debug, Clone)]
pub struct ResolvedTenant {
    pub scope: TenantScope,
    pub organization: Organization,
    pub profile: Profile,
}

/// Maps an identity to its organization via the profile row.
///
/// Resolution is by the profile's stored org id, never by scanning rosters:
/// an email that exists on several organizations' member lists still
/// resolves to exactly one tenant.
pub struct TenantResolver<P: ProfileRepository, O: OrganizationRepository> {
    profiles: P,
    orgs: O,
}

impl<P: ProfileRepository, O: OrganizationRepository> TenantResolver<P, O> {
    pub fn new(profiles: P, orgs: O) -> Self {
        Self { profiles, orgs }
    }

    pub fn profiles(&self) -> &P {
        &self.profiles
    }

    /// Resolves the scope alone.
    ///
    /// # Errors
    ///
    /// `CoreError::TenantUnresolved` when no profile row exists. "No
    /// tenant" always means "no access", never a default tenant.
    pub async fn resolve(&self, identity: &Identity) -> Result<TenantScope, CoreError> {
        let profile = self
            .profiles
            .find_by_identity(&identity.id)
            .await?
            .ok_or(CoreError::TenantUnresolved)?;

        Ok(TenantScope::new(profile.org_id))
    }

    /// Resolves the scope plus the organization and profile rows, checking
    /// suspension.
    ///
    /// # Errors
    ///
    /// - `CoreError::TenantUnresolved` - no profile row
    /// - `CoreError::OrganizationNotFound` - profile points at a deleted org
    /// - `CoreError::OrganizationSuspended` - suspension blocks all use
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "resolve_tenant", skip_all, err)
    )]
    pub async fn resolve_full(&self, identity: &Identity) -> Result<ResolvedTenant, CoreError> {
        let profile = self
            .profiles
            .find_by_identity(&identity.id)
            .await?
            .ok_or(CoreError::TenantUnresolved)?;

        let organization = self
            .orgs
            .find_by_id(profile.org_id)
            .await?
            .ok_or(CoreError::OrganizationNotFound)?;

        if organization.suspended {
            log::warn!(
                target: LOG_TARGET,
                "msg=\"sign-in into suspended organization blocked\", org_id={}",
                organization.id
            );
            return Err(CoreError::OrganizationSuspended);
        }

        Ok(ResolvedTenant {
            scope: TenantScope::new(profile.org_id),
            organization,
            profile,
        })
    }
}
