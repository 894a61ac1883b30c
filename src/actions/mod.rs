//! Use-case actions, one struct per operation.
//!
//! Each action owns the repositories and boundary traits it needs, exposes
//! a `new` constructor and an async `execute`, and fires the corresponding
//! [`AppEvent`](crate::events::AppEvent) on success. Actor permission checks
//! happen inside `execute`; callers only supply the tenant scope and the
//! actor's email.

mod add_member;
mod complete_recovery;
mod complete_setup;
mod remove_member;
mod secure_account;
mod send_communication;
mod sign_in;
mod update_permissions;

pub use add_member::{AddMemberAction, AddMemberInput, AddMemberOutput};
pub use complete_recovery::CompleteRecoveryAction;
pub use complete_setup::{CompleteSetupAction, CompleteSetupInput};
pub use remove_member::RemoveMemberAction;
pub use secure_account::SecureAccountAction;
pub use send_communication::{SendCommunicationAction, SendCommunicationInput};
pub use sign_in::{SignInAction, SignInOutcome};
pub use update_permissions::{MatrixChange, UpdatePermissionsAction};
