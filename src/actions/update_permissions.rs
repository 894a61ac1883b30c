use chrono::Utc;

use crate::events::{dispatch, AppEvent};
use crate::rbac::{evaluate, CrudAction, Page};
use crate::repository::Member;
use crate::tenant::TenantScope;
use crate::{CoreError, MemberRepository, LOG_TARGET};

/// One edit to a member's permission matrix.
#[derive(Debug, Clone, Copy)]
pub enum MatrixChange {
    /// Flip one page/action cell.
    Toggle { page: Page, action: CrudAction },
    /// Flip a whole page row: everything off if all four are effectively
    /// on, everything on otherwise.
    ToggleAll { page: Page },
}

/// Action to edit another member's permission matrix.
///
/// The change is applied to a copy of the stored matrix and written back
/// whole in a single `set_matrix` call; concurrent editors are last-write-
/// wins at the row level, never a torn record.
pub struct UpdatePermissionsAction<M: MemberRepository> {
    members: M,
}

impl<M: MemberRepository> UpdatePermissionsAction<M> {
    pub fn new(members: M) -> Self {
        Self { members }
    }

    /// # Errors
    ///
    /// - `CoreError::PermissionDenied` - actor lacks update on Members
    /// - `CoreError::MemberNotFound` - actor not on this roster, or the
    ///   target id is not in this organization
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_permissions", skip_all, err)
    )]
    pub async fn execute(
        &self,
        scope: TenantScope,
        actor_email: &str,
        member_id: i64,
        change: MatrixChange,
    ) -> Result<Member, CoreError> {
        let actor = self
            .members
            .find_by_org_and_email(scope.org_id(), actor_email)
            .await?
            .ok_or(CoreError::MemberNotFound)?;

        if !evaluate(&actor.role, &actor.matrix, Page::Members, CrudAction::Update) {
            return Err(CoreError::PermissionDenied);
        }

        let target = self
            .members
            .find_by_id(member_id)
            .await?
            .filter(|m| m.org_id == scope.org_id())
            .ok_or(CoreError::MemberNotFound)?;

        let mut matrix = target.matrix.clone();
        match change {
            MatrixChange::Toggle { page, action } => {
                matrix.toggle(page, action);
            }
            MatrixChange::ToggleAll { page } => {
                matrix.toggle_all(page);
            }
        }

        let updated = self.members.set_matrix(target.id, &matrix).await?;

        log::info!(
            target: LOG_TARGET,
            "msg=\"permissions changed\", org_id={}, member_id={}",
            scope.org_id(),
            target.id
        );

        dispatch(AppEvent::PermissionsChanged {
            org_id: scope.org_id(),
            member_id: target.id,
            at: Utc::now(),
        })
        .await;

        Ok(updated)
    }
}

#[cfg(all(test, feature = "mocks"))]
mod tests {
    use super::*;
    use crate::rbac::PermissionMatrix;
    use crate::repository::{CreateMember, MockMemberRepository};

    async fn seed(members: &MockMemberRepository, org_id: i64, email: &str, role: &str) -> i64 {
        members
            .create(CreateMember {
                org_id,
                full_name: "Someone".to_owned(),
                email: email.to_owned(),
                phone: None,
                role: role.to_owned(),
                matrix: PermissionMatrix::new(),
                major: None,
                gpa: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_toggle_one_cell() {
        let members = MockMemberRepository::new();
        seed(&members, 1, "pres@x.edu", "president").await;
        let target = seed(&members, 1, "member@x.edu", "member").await;

        let action = UpdatePermissionsAction::new(members);
        let updated = action
            .execute(
                TenantScope::new(1),
                "pres@x.edu",
                target,
                MatrixChange::Toggle {
                    page: Page::Finances,
                    action: CrudAction::Read,
                },
            )
            .await
            .unwrap();

        // read defaults to allow, so the first toggle turns it off
        assert!(!updated.matrix.allows(Page::Finances, CrudAction::Read));
        // other cells untouched
        assert!(updated.matrix.allows(Page::Events, CrudAction::Read));
    }

    #[tokio::test]
    async fn test_toggle_all_row() {
        let members = MockMemberRepository::new();
        seed(&members, 1, "pres@x.edu", "president").await;
        let target = seed(&members, 1, "member@x.edu", "member").await;

        let action = UpdatePermissionsAction::new(members);
        let updated = action
            .execute(
                TenantScope::new(1),
                "pres@x.edu",
                target,
                MatrixChange::ToggleAll {
                    page: Page::Documents,
                },
            )
            .await
            .unwrap();

        // the row was not fully on (mutations default off), so it turns on
        for crud in CrudAction::ALL {
            assert!(updated.matrix.allows(Page::Documents, crud));
        }
    }

    #[tokio::test]
    async fn test_requires_update_permission() {
        let members = MockMemberRepository::new();
        seed(&members, 1, "member@x.edu", "member").await;
        let target = seed(&members, 1, "other@x.edu", "member").await;

        let action = UpdatePermissionsAction::new(members);
        let result = action
            .execute(
                TenantScope::new(1),
                "member@x.edu",
                target,
                MatrixChange::ToggleAll { page: Page::Events },
            )
            .await;

        assert_eq!(result.unwrap_err(), CoreError::PermissionDenied);
    }

    #[tokio::test]
    async fn test_cannot_edit_other_tenant() {
        let members = MockMemberRepository::new();
        seed(&members, 1, "pres@x.edu", "president").await;
        let foreign = seed(&members, 2, "other@y.edu", "member").await;

        let action = UpdatePermissionsAction::new(members);
        let result = action
            .execute(
                TenantScope::new(1),
                "pres@x.edu",
                foreign,
                MatrixChange::ToggleAll { page: Page::Events },
            )
            .await;

        assert_eq!(result.unwrap_err(), CoreError::MemberNotFound);
    }
}
