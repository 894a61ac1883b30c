use chrono::Utc;

use crate::events::{dispatch, AppEvent};
use crate::rbac::{evaluate, CrudAction, Page};
use crate::repository::MemberStatus;
use crate::tenant::TenantScope;
use crate::{CoreError, MemberRepository, ProfileRepository, LOG_TARGET};

/// Action to remove a member from the roster.
///
/// Removal is a soft delete: the entry flips to `Inactive` so dues and
/// event history keep their author, and the linked profile row is deleted
/// so the identity can no longer resolve a tenant. Ids from other tenants
/// read as not found, never as forbidden.
pub struct RemoveMemberAction<M: MemberRepository, P: ProfileRepository> {
    members: M,
    profiles: P,
}

impl<M: MemberRepository, P: ProfileRepository> RemoveMemberAction<M, P> {
    pub fn new(members: M, profiles: P) -> Self {
        Self { members, profiles }
    }

    /// # Errors
    ///
    /// - `CoreError::PermissionDenied` - actor lacks delete on Members
    /// - `CoreError::MemberNotFound` - actor not on this roster, or the
    ///   target id does not exist in this organization
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "remove_member", skip_all, err)
    )]
    pub async fn execute(
        &self,
        scope: TenantScope,
        actor_email: &str,
        member_id: i64,
    ) -> Result<(), CoreError> {
        let actor = self
            .members
            .find_by_org_and_email(scope.org_id(), actor_email)
            .await?
            .ok_or(CoreError::MemberNotFound)?;

        if !evaluate(&actor.role, &actor.matrix, Page::Members, CrudAction::Delete) {
            return Err(CoreError::PermissionDenied);
        }

        let target = self
            .members
            .find_by_id(member_id)
            .await?
            .filter(|m| m.org_id == scope.org_id())
            .ok_or(CoreError::MemberNotFound)?;

        self.members
            .update_status(target.id, MemberStatus::Inactive)
            .await?;

        // a still-pending member never activated, so there is no profile
        if let Some(identity_id) = target.identity_id.as_deref() {
            self.profiles.delete_by_identity(identity_id).await?;
        }

        log::info!(
            target: LOG_TARGET,
            "msg=\"member removed\", org_id={}, member_id={}, profile_revoked={}",
            scope.org_id(),
            target.id,
            target.identity_id.is_some()
        );

        dispatch(AppEvent::MemberRemoved {
            org_id: scope.org_id(),
            member_id: target.id,
            at: Utc::now(),
        })
        .await;

        Ok(())
    }
}
