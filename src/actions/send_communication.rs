use chrono::Utc;

use crate::branding::OrgBranding;
use crate::email::{EmailDispatcher, EmailRequest};
use crate::events::{dispatch, AppEvent};
use crate::gateway::{CommunicationLog, CommunicationLogDraft, ResourceGateway, TenantStore};
use crate::rbac::{evaluate, CrudAction, Page};
use crate::repository::Organization;
use crate::{CoreError, MemberRepository, LOG_TARGET};

/// Input for sending a message to a set of chapter members.
#[derive(Debug, Clone)]
pub struct SendCommunicationInput {
    pub recipients: Vec<String>,
    pub subject: String,
    pub message: String,
}

/// Action to email a group of members and record it in the history.
///
/// The whole recipient list goes out as one dispatcher call; the dispatcher
/// owns batching and per-recipient delivery. The sender identity is the
/// organization's contact address under its branded display name. A history
/// entry is written only after the dispatcher accepts the request.
pub struct SendCommunicationAction<D, M, S>
where
    D: EmailDispatcher,
    M: MemberRepository,
    S: TenantStore<CommunicationLog>,
{
    dispatcher: D,
    members: M,
    history: ResourceGateway<CommunicationLog, S>,
}

impl<D, M, S> SendCommunicationAction<D, M, S>
where
    D: EmailDispatcher,
    M: MemberRepository,
    S: TenantStore<CommunicationLog>,
{
    /// The gateway's scope must be the actor's resolved tenant; the action
    /// sends and records only within it.
    pub fn new(dispatcher: D, members: M, history: ResourceGateway<CommunicationLog, S>) -> Self {
        Self {
            dispatcher,
            members,
            history,
        }
    }

    /// # Errors
    ///
    /// - `CoreError::PermissionDenied` - actor lacks create on History
    /// - `CoreError::MemberNotFound` - actor not on this roster
    /// - `CoreError::Internal(_)` - organization has no contact address
    /// - `CoreError::StoreError(_)` - dispatcher rejected the request
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "send_communication", skip_all, err)
    )]
    pub async fn execute(
        &self,
        organization: &Organization,
        actor_email: &str,
        input: SendCommunicationInput,
    ) -> Result<CommunicationLog, CoreError> {
        let scope = self.history.scope();

        let actor = self
            .members
            .find_by_org_and_email(scope.org_id(), actor_email)
            .await?
            .ok_or(CoreError::MemberNotFound)?;

        if !evaluate(&actor.role, &actor.matrix, Page::History, CrudAction::Create) {
            return Err(CoreError::PermissionDenied);
        }

        let sender_email = organization
            .contact_email
            .clone()
            .ok_or_else(|| CoreError::Internal("organization has no contact email".into()))?;
        let branding = OrgBranding::derive(&organization.name);

        let recipient_count = input.recipients.len();
        self.dispatcher
            .dispatch(EmailRequest {
                recipients: input.recipients,
                subject: input.subject.clone(),
                message: input.message,
                sender_email,
                sender_name: branding.display_name,
            })
            .await?;

        let entry = self
            .history
            .create(CommunicationLogDraft {
                subject: input.subject,
                recipient_count,
                sent_by: actor.email.clone(),
            })
            .await?;

        log::info!(
            target: LOG_TARGET,
            "msg=\"communication sent\", org_id={}, recipients={}",
            scope.org_id(),
            recipient_count
        );

        dispatch(AppEvent::CommunicationSent {
            org_id: scope.org_id(),
            recipient_count,
            at: Utc::now(),
        })
        .await;

        Ok(entry)
    }
}
