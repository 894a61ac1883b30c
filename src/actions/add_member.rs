use chrono::{DateTime, Utc};

use crate::config::CoreConfig;
use crate::crypto::{generate_token, hash_token, SecretString};
use crate::events::{dispatch, AppEvent};
use crate::rbac::{evaluate, CrudAction, Page, PermissionMatrix};
use crate::repository::{CreateMember, Member};
use crate::tenant::TenantScope;
use crate::validators::{validate_email, validate_name};
use crate::{CoreError, MemberRepository, LOG_TARGET};

/// Input data for adding a member to the roster.
#[derive(Debug, Clone)]
pub struct AddMemberInput {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub matrix: PermissionMatrix,
    pub major: Option<String>,
    pub gpa: Option<f32>,
}

/// Output from adding a member.
#[derive(Debug)]
pub struct AddMemberOutput {
    /// The created roster entry, status `Pending`.
    pub member: Member,
    /// The plain invitation token to send to the invitee (not stored, only
    /// returned once).
    pub token: SecretString,
    /// SHA-256 of the token, for the embedding application to persist and
    /// match against the activation link.
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Action to add a member to the organization's roster.
///
/// This action:
/// 1. Verifies the actor may create on the Members page
/// 2. Validates the invitee's name and email
/// 3. Creates the roster entry in `Pending` status with the given matrix
/// 4. Generates a secure invitation token
///
/// The returned token should be sent to the invitee via email. It is hashed
/// here and cannot be recovered later.
pub struct AddMemberAction<M: MemberRepository> {
    members: M,
    config: CoreConfig,
}

impl<M: MemberRepository> AddMemberAction<M> {
    pub fn new(members: M) -> Self {
        Self {
            members,
            config: CoreConfig::default(),
        }
    }

    pub fn with_config(members: M, config: CoreConfig) -> Self {
        Self { members, config }
    }

    /// # Errors
    ///
    /// - `CoreError::PermissionDenied` - actor lacks create on Members
    /// - `CoreError::MemberNotFound` - actor has no roster entry here
    /// - `CoreError::DuplicateEmail` - invitee already on this roster
    /// - `CoreError::Validation(_)` - bad name or email
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "add_member", skip_all, err)
    )]
    pub async fn execute(
        &self,
        scope: TenantScope,
        actor_email: &str,
        input: AddMemberInput,
    ) -> Result<AddMemberOutput, CoreError> {
        let actor = self
            .members
            .find_by_org_and_email(scope.org_id(), actor_email)
            .await?
            .ok_or(CoreError::MemberNotFound)?;

        if !evaluate(&actor.role, &actor.matrix, Page::Members, CrudAction::Create) {
            return Err(CoreError::PermissionDenied);
        }

        validate_name(&input.full_name)?;
        validate_email(&input.email)?;

        let member = self
            .members
            .create(CreateMember {
                org_id: scope.org_id(),
                full_name: input.full_name,
                email: input.email,
                phone: input.phone,
                role: input.role,
                matrix: input.matrix,
                major: input.major,
                gpa: input.gpa,
            })
            .await?;

        let token = generate_token(self.config.token_length);
        let token_hash = hash_token(&token);
        let expires_at = Utc::now() + self.config.invitation_expiry;

        log::info!(
            target: LOG_TARGET,
            "msg=\"member invited\", org_id={}, member_id={}, email=\"{}\"",
            member.org_id,
            member.id,
            member.email
        );

        dispatch(AppEvent::MemberInvited {
            org_id: member.org_id,
            member_id: member.id,
            email: member.email.clone(),
            at: Utc::now(),
        })
        .await;

        Ok(AddMemberOutput {
            member,
            token: SecretString::new(token),
            token_hash,
            expires_at,
        })
    }
}
