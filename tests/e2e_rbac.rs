//! End-to-end tests for the permission matrix and page guard.
//!
//! These tests walk a chapter through its everyday access-control flows
//! using mock repositories. Run with: `cargo test --test e2e_rbac`

#![cfg(feature = "mocks")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use chapterhouse::actions::{
    AddMemberAction, AddMemberInput, MatrixChange, RemoveMemberAction, UpdatePermissionsAction,
};
use chapterhouse::{
    CoreError, CreateMember, CreateOrganization, CrudAction, Denial, MemberRepository,
    MockAuthProvider, MockMemberRepository, MockOrganizationRepository, MockProfileRepository,
    OrganizationRepository, Page, PageGuard, PermissionMatrix, ProfileRepository,
    SessionStore, TenantResolver, UpsertProfile,
};
use chapterhouse::session::RecoverySignal;

struct Chapter {
    provider: MockAuthProvider,
    orgs: MockOrganizationRepository,
    members: MockMemberRepository,
    profiles: MockProfileRepository,
    session: SessionStore<MockAuthProvider>,
    org_id: i64,
}

impl Chapter {
    async fn new(name: &str) -> Self {
        let provider = MockAuthProvider::new();
        let session = SessionStore::new(provider.clone(), RecoverySignal::default());
        let orgs = MockOrganizationRepository::new();
        let org_id = orgs
            .create(CreateOrganization {
                name: name.to_owned(),
                chapter_label: Some("Beta Chapter".to_owned()),
                brand_color: None,
                contact_email: Some("board@x.edu".to_owned()),
                default_dues: Some(45.0),
            })
            .await
            .unwrap()
            .id;

        Self {
            provider,
            orgs,
            members: MockMemberRepository::new(),
            profiles: MockProfileRepository::new(),
            session,
            org_id,
        }
    }

    async fn enroll(&self, identity_id: &str, email: &str, role: &str, matrix: PermissionMatrix) {
        let member = self
            .members
            .create(CreateMember {
                org_id: self.org_id,
                full_name: "Member".to_owned(),
                email: email.to_owned(),
                phone: None,
                role: role.to_owned(),
                matrix,
                major: None,
                gpa: None,
            })
            .await
            .unwrap();
        self.members
            .update_status(member.id, chapterhouse::MemberStatus::Active)
            .await
            .unwrap();
        self.members
            .link_identity(member.id, identity_id)
            .await
            .unwrap();
        self.profiles
            .upsert(UpsertProfile {
                identity_id: identity_id.to_owned(),
                org_id: self.org_id,
                full_name: "Member".to_owned(),
                role: role.to_owned(),
                setup_complete: true,
            })
            .await
            .unwrap();
        self.provider.register(identity_id, email, "pw");
    }

    fn sign_in_as(&self, identity_id: &str, email: &str) {
        self.provider
            .force_session(chapterhouse::Identity::new(identity_id, email));
    }

    fn guard(
        &self,
    ) -> PageGuard<
        MockAuthProvider,
        MockProfileRepository,
        MockOrganizationRepository,
        MockMemberRepository,
    > {
        PageGuard::new(
            self.session.clone(),
            TenantResolver::new(self.profiles.clone(), self.orgs.clone()),
            self.members.clone(),
        )
    }
}

#[tokio::test]
async fn test_president_has_full_access_with_empty_matrix() {
    let chapter = Chapter::new("Alpha Phi Omega - Beta Chapter").await;
    chapter
        .enroll("uid-pres", "pres@x.edu", "President", PermissionMatrix::new())
        .await;
    chapter.sign_in_as("uid-pres", "pres@x.edu");

    let guard = chapter.guard();
    for page in Page::ALL {
        let ctx = guard.enter(page).await.unwrap();
        // privileged roles also pass every mutation check
        for action in CrudAction::ALL {
            assert!(
                chapterhouse::rbac::evaluate(&ctx.member.role, &ctx.member.matrix, page, action),
                "president denied {action:?} on {page}"
            );
        }
    }
}

#[tokio::test]
async fn test_member_with_finances_read_off_is_redirected() {
    let chapter = Chapter::new("Alpha Phi Omega - Beta Chapter").await;
    let mut matrix = PermissionMatrix::new();
    matrix.set(Page::Finances, CrudAction::Read, false);
    chapter
        .enroll("uid-m", "member@x.edu", "member", matrix)
        .await;
    chapter.sign_in_as("uid-m", "member@x.edu");

    let guard = chapter.guard();

    // other pages still open under the read-open default
    assert!(guard.enter(Page::Events).await.is_ok());

    match guard.enter(Page::Finances).await.unwrap_err() {
        Denial::Landing { notice } => {
            assert!(notice.contains("Finances"));
            assert_eq!(guard.landing_page(), "overview");
        }
        other => panic!("expected landing redirect, got {other:?}"),
    }
}

#[tokio::test]
async fn test_mutation_defaults_closed_read_defaults_open() {
    let chapter = Chapter::new("Omega").await;
    chapter
        .enroll("uid-m", "member@x.edu", "member", PermissionMatrix::new())
        .await;
    chapter.sign_in_as("uid-m", "member@x.edu");

    // reads pass everywhere
    let ctx = chapter.guard().enter(Page::Documents).await.unwrap();

    // but an unset create cell denies
    assert!(!ctx
        .member
        .matrix
        .allows(Page::Documents, CrudAction::Create));

    let add = AddMemberAction::new(chapter.members.clone());
    let result = add
        .execute(
            ctx.scope,
            "member@x.edu",
            AddMemberInput {
                full_name: "New Pledge".to_owned(),
                email: "pledge@x.edu".to_owned(),
                phone: None,
                role: "member".to_owned(),
                matrix: PermissionMatrix::new(),
                major: None,
                gpa: None,
            },
        )
        .await;
    assert_eq!(result.unwrap_err(), CoreError::PermissionDenied);
}

#[tokio::test]
async fn test_granting_members_update_enables_permission_edits() {
    let chapter = Chapter::new("Omega").await;
    chapter
        .enroll("uid-pres", "pres@x.edu", "president", PermissionMatrix::new())
        .await;
    let mut officer_matrix = PermissionMatrix::new();
    officer_matrix.set(Page::Members, CrudAction::Update, true);
    chapter
        .enroll("uid-officer", "officer@x.edu", "secretary", officer_matrix)
        .await;
    chapter
        .enroll("uid-m", "member@x.edu", "member", PermissionMatrix::new())
        .await;

    chapter.sign_in_as("uid-officer", "officer@x.edu");
    let ctx = chapter.guard().enter(Page::Members).await.unwrap();

    let target = chapter
        .members
        .find_by_org_and_email(chapter.org_id, "member@x.edu")
        .await
        .unwrap()
        .unwrap();

    let update = UpdatePermissionsAction::new(chapter.members.clone());
    let updated = update
        .execute(
            ctx.scope,
            "officer@x.edu",
            target.id,
            MatrixChange::Toggle {
                page: Page::Compliance,
                action: CrudAction::Update,
            },
        )
        .await
        .unwrap();

    assert!(updated.matrix.allows(Page::Compliance, CrudAction::Update));

    // the single-write contract materializes the whole row
    let record = updated.matrix.record(Page::Compliance).unwrap();
    assert_eq!(record.read, Some(true));
    assert_eq!(record.create, Some(false));
}

#[tokio::test]
async fn test_removed_member_is_locked_out_on_next_page_load() {
    let chapter = Chapter::new("Omega").await;
    chapter
        .enroll("uid-pres", "pres@x.edu", "president", PermissionMatrix::new())
        .await;
    chapter
        .enroll("uid-m", "member@x.edu", "member", PermissionMatrix::new())
        .await;

    let target = chapter
        .members
        .find_by_org_and_email(chapter.org_id, "member@x.edu")
        .await
        .unwrap()
        .unwrap();

    // president removes the member
    chapter.sign_in_as("uid-pres", "pres@x.edu");
    let ctx = chapter.guard().enter(Page::Members).await.unwrap();
    RemoveMemberAction::new(chapter.members.clone(), chapter.profiles.clone())
        .execute(ctx.scope, "pres@x.edu", target.id)
        .await
        .unwrap();

    // roster entry kept for history, profile revoked
    let row = chapter
        .members
        .find_by_id(target.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, chapterhouse::MemberStatus::Inactive);
    assert!(chapter
        .profiles
        .find_by_identity("uid-m")
        .await
        .unwrap()
        .is_none());

    // the removed member's next page load bounces to sign-in
    chapter.sign_in_as("uid-m", "member@x.edu");
    let result = chapter.guard().enter(Page::Events).await;
    assert_eq!(result.unwrap_err(), Denial::SignIn);
    assert!(chapter.session.identity().is_none());
}
