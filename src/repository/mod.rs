//! Storage traits and record types for organizations, roster members, and
//! identity profiles. Every implementation is expected to be redundantly
//! tenant-safe: the explicit org-id filters in these signatures are the
//! non-negotiable client contract, server-side row policies are the backstop.

mod member;
mod organization;
mod profile;

pub use member::{CreateMember, Member, MemberRepository, MemberStatus, MemberUpdate};
pub use organization::{
    CreateOrganization, Organization, OrganizationRepository, OrganizationUpdate,
};
pub use profile::{Profile, ProfileRepository, UpsertProfile};

#[cfg(feature = "mocks")]
mod member_mock;
#[cfg(feature = "mocks")]
mod organization_mock;
#[cfg(feature = "mocks")]
mod profile_mock;

#[cfg(feature = "mocks")]
pub use member_mock::MockMemberRepository;
#[cfg(feature = "mocks")]
pub use organization_mock::MockOrganizationRepository;
#[cfg(feature = "mocks")]
pub use profile_mock::MockProfileRepository;
