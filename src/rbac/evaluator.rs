//! The allow/deny decision for (identity, tenant, page, action).

use crate::repository::MemberRepository;
use crate::CoreError;

use super::matrix::PermissionMatrix;
use super::page::{CrudAction, Page};

/// Roles that bypass the stored matrix entirely.
pub const PRIVILEGED_ROLES: [&str; 2] = ["admin", "president"];

/// Whether a free-text role is privileged. Comparison is case-insensitive
/// and ignores surrounding whitespace.
pub fn is_privileged(role: &str) -> bool {
    let role = role.trim().to_lowercase();
    PRIVILEGED_ROLES.contains(&role.as_str())
}

/// The pure permission rule: privileged roles get everything; everyone else
/// gets what the stored matrix says, under its asymmetric defaults.
pub fn evaluate(role: &str, matrix: &PermissionMatrix, page: Page, action: CrudAction) -> bool {
    if is_privileged(role) {
        return true;
    }
    matrix.allows(page, action)
}

/// Computes `can_do(page, action)` for a caller identified by
/// (organization, email).
///
/// The member row is resolved by exact organization id and case-insensitive
/// email on every call; evaluation itself has no side effects.
pub struct PermissionEvaluator<M: MemberRepository> {
    members: M,
}

impl<M: MemberRepository> PermissionEvaluator<M> {
    pub fn new(members: M) -> Self {
        Self { members }
    }

    /// Resolves the caller's member row and evaluates one cell.
    ///
    /// # Errors
    ///
    /// - `CoreError::MemberNotFound` - no roster entry for this email in
    ///   this organization (a removed member has no access)
    /// - `Err(_)` - data store errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "can_do", skip(self), err)
    )]
    pub async fn can_do(
        &self,
        org_id: i64,
        email: &str,
        page: Page,
        action: CrudAction,
    ) -> Result<bool, CoreError> {
        let member = self
            .members
            .find_by_org_and_email(org_id, email)
            .await?
            .ok_or(CoreError::MemberNotFound)?;

        Ok(evaluate(&member.role, &member.matrix, page, action))
    }

    /// Page-entry check: `Err(PermissionDenied)` when the caller may not
    /// read the page, so data fetches cannot proceed on denial.
    pub async fn authorize_read(
        &self,
        org_id: i64,
        email: &str,
        page: Page,
    ) -> Result<(), CoreError> {
        if self.can_do(org_id, email, page, CrudAction::Read).await? {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied)
        }
    }
}


#[cfg(all(test, feature = "mocks"))]
mod repo_tests {
    use super::*;
    use crate::repository::{CreateMember, MemberRepository, MockMemberRepository};

    async fn seed_member(
        repo: &MockMemberRepository,
        org_id: i64,
        email: &str,
        role: &str,
        matrix: PermissionMatrix,
    ) {
        repo.create(CreateMember {
            org_id,
            full_name: "Test Member".to_owned(),
            email: email.to_owned(),
            phone: None,
            role: role.to_owned(),
            matrix,
            major: None,
            gpa: None,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_can_do_resolves_email_case_insensitively() {
        let repo = MockMemberRepository::new();
        seed_member(&repo, 1, "Member@X.edu", "Member", PermissionMatrix::new()).await;

        let evaluator = PermissionEvaluator::new(repo);
        let allowed = evaluator
            .can_do(1, "member@x.edu", Page::Events, CrudAction::Read)
            .await
            .unwrap();
        assert!(allowed);
    }

    #[tokio::test]
    async fn test_can_do_unknown_member() {
        let repo = MockMemberRepository::new();
        let evaluator = PermissionEvaluator::new(repo);

        let result = evaluator
            .can_do(1, "ghost@x.edu", Page::Events, CrudAction::Read)
            .await;
        assert_eq!(result.unwrap_err(), CoreError::MemberNotFound);
    }

    #[tokio::test]
    async fn test_authorize_read_denies() {
        let repo = MockMemberRepository::new();
        let mut matrix = PermissionMatrix::new();
        matrix.set(Page::Finances, CrudAction::Read, false);
        seed_member(&repo, 1, "member@x.edu", "Member", matrix).await;

        let evaluator = PermissionEvaluator::new(repo);
        let result = evaluator.authorize_read(1, "member@x.edu", Page::Finances).await;
        assert_eq!(result.unwrap_err(), CoreError::PermissionDenied);

        let result = evaluator.authorize_read(1, "member@x.edu", Page::Events).await;
        assert!(result.is_ok());
    }
}
