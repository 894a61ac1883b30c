//! Chapterhouse is the access-control core of a multi-tenant club/chapter
//! management application: a per-organization, per-member CRUD permission
//! matrix, a tenant-isolation layer that scopes every read and write to one
//! organization, and the account-activation state machine that gates
//! application use until an invited member has secured their account.
//!
//! The crate is transport-agnostic. Storage sits behind repository traits
//! (in-memory mocks behind the `mocks` feature, SQLite behind `sqlite`), and
//! the hosted authentication provider and outbound mail function are boundary
//! traits the embedding application implements.

pub mod actions;
pub mod activation;
pub mod branding;
pub mod config;
pub mod crypto;
pub mod email;
pub mod events;
pub mod gateway;
pub mod guard;
pub mod rbac;
pub mod repository;
pub mod session;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod tenant;
pub mod validators;

use std::fmt;

pub use activation::ActivationState;
pub use branding::OrgBranding;
pub use config::CoreConfig;
pub use crypto::SecretString;
pub use events::register_event_listeners;
pub use guard::{Denial, PageContext, PageGuard};
pub use rbac::{CrudAction, Page, PermissionEvaluator, PermissionMatrix};
pub use repository::{
    CreateMember, CreateOrganization, Member, MemberRepository, MemberStatus, MemberUpdate,
    Organization, OrganizationRepository, OrganizationUpdate, Profile, ProfileRepository,
    UpsertProfile,
};
pub use session::{AuthProvider, Identity, RecoverySignal, SessionStore};
pub use tenant::{TenantResolver, TenantScope};
pub use validators::ValidationError;

#[cfg(feature = "mocks")]
pub use email::MockEmailDispatcher;
#[cfg(feature = "mocks")]
pub use repository::{MockMemberRepository, MockOrganizationRepository, MockProfileRepository};
#[cfg(feature = "mocks")]
pub use session::MockAuthProvider;

/// Log target used by every module in this crate.
pub(crate) const LOG_TARGET: &str = "chapterhouse";

#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// No authenticated identity; the caller must be sent to sign-in.
    Unauthenticated,
    /// The caller is authenticated but the permission matrix denies the
    /// requested page/action.
    PermissionDenied,
    /// No profile row exists for the identity, so no tenant can be resolved.
    /// There is never a fallback tenant.
    TenantUnresolved,
    OrganizationNotFound,
    /// The organization is suspended; sign-in is blocked for its members.
    OrganizationSuspended,
    MemberNotFound,
    ProfileNotFound,
    RecordNotFound,
    /// A roster entry with this email already exists in the organization.
    DuplicateEmail,
    InvalidCredentials,
    PasswordHashError,
    Validation(ValidationError),
    /// Rejected by the data store; the message is the store's description.
    StoreError(String),
    Internal(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Unauthenticated => write!(f, "Not signed in"),
            CoreError::PermissionDenied => write!(f, "You do not have permission to do that"),
            CoreError::TenantUnresolved => write!(f, "No organization is linked to this account"),
            CoreError::OrganizationNotFound => write!(f, "Organization not found"),
            CoreError::OrganizationSuspended => write!(f, "This organization has been suspended"),
            CoreError::MemberNotFound => write!(f, "Member not found"),
            CoreError::ProfileNotFound => write!(f, "Profile not found"),
            CoreError::RecordNotFound => write!(f, "Record not found"),
            CoreError::DuplicateEmail => {
                write!(
                    f,
                    "A member with this email already exists in the organization"
                )
            }
            CoreError::InvalidCredentials => write!(f, "Invalid email or password"),
            CoreError::PasswordHashError => write!(f, "Failed to hash password"),
            CoreError::Validation(e) => write!(f, "{e}"),
            CoreError::StoreError(msg) => write!(f, "Data store error: {msg}"),
            CoreError::Internal(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<ValidationError> for CoreError {
    fn from(e: ValidationError) -> Self {
        CoreError::Validation(e)
    }
}
