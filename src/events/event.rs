use chrono::{DateTime, Utc};

/// Domain events emitted by chapterhouse.
///
/// Events are fired by the actions and the session layer. If no listeners
/// are registered, they are silently ignored (no-op). Register listeners via
/// [`register_event_listeners`](crate::register_event_listeners) to handle events.
#[derive(Debug, Clone)]
pub enum AppEvent {
    // roster lifecycle
    MemberInvited {
        org_id: i64,
        member_id: i64,
        email: String,
        at: DateTime<Utc>,
    },
    MemberActivated {
        org_id: i64,
        member_id: i64,
        at: DateTime<Utc>,
    },
    MemberRemoved {
        org_id: i64,
        member_id: i64,
        at: DateTime<Utc>,
    },

    // access control
    PermissionsChanged {
        org_id: i64,
        member_id: i64,
        at: DateTime<Utc>,
    },

    // sessions
    SignInSuccess {
        org_id: i64,
        email: String,
        at: DateTime<Utc>,
    },
    SignInFailed {
        email: String,
        reason: String,
        at: DateTime<Utc>,
    },
    SignOut {
        email: String,
        at: DateTime<Utc>,
    },

    // account recovery
    RecoveryRequested {
        email: String,
        at: DateTime<Utc>,
    },
    RecoveryCompleted {
        email: String,
        at: DateTime<Utc>,
    },

    // messaging
    CommunicationSent {
        org_id: i64,
        recipient_count: usize,
        at: DateTime<Utc>,
    },
}

impl AppEvent {
    /// Returns a dot-separated event name for logging/tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MemberInvited { .. } => "roster.member.invited",
            Self::MemberActivated { .. } => "roster.member.activated",
            Self::MemberRemoved { .. } => "roster.member.removed",
            Self::PermissionsChanged { .. } => "roster.permissions.changed",
            Self::SignInSuccess { .. } => "session.sign_in.success",
            Self::SignInFailed { .. } => "session.sign_in.failed",
            Self::SignOut { .. } => "session.sign_out",
            Self::RecoveryRequested { .. } => "recovery.requested",
            Self::RecoveryCompleted { .. } => "recovery.completed",
            Self::CommunicationSent { .. } => "communication.sent",
        }
    }

    /// Returns the timestamp when this event occurred.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::MemberInvited { at, .. }
            | Self::MemberActivated { at, .. }
            | Self::MemberRemoved { at, .. }
            | Self::PermissionsChanged { at, .. }
            | Self::SignInSuccess { at, .. }
            | Self::SignInFailed { at, .. }
            | Self::SignOut { at, .. }
            | Self::RecoveryRequested { at, .. }
            | Self::RecoveryCompleted { at, .. }
            | Self::CommunicationSent { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let now = Utc::now();

        assert_eq!(
            AppEvent::MemberInvited {
                org_id: 1,
                member_id: 2,
                email: "pledge@x.edu".to_owned(),
                at: now
            }
            .name(),
            "roster.member.invited"
        );

        assert_eq!(
            AppEvent::MemberActivated {
                org_id: 1,
                member_id: 2,
                at: now
            }
            .name(),
            "roster.member.activated"
        );

        assert_eq!(
            AppEvent::SignInFailed {
                email: "pledge@x.edu".to_owned(),
                reason: "invalid credentials".to_owned(),
                at: now
            }
            .name(),
            "session.sign_in.failed"
        );

        assert_eq!(
            AppEvent::CommunicationSent {
                org_id: 1,
                recipient_count: 12,
                at: now
            }
            .name(),
            "communication.sent"
        );
    }

    #[test]
    fn test_event_timestamp() {
        let now = Utc::now();

        let event = AppEvent::SignInSuccess {
            org_id: 1,
            email: "pledge@x.edu".to_owned(),
            at: now,
        };

        assert_eq!(event.timestamp(), now);
    }
}
