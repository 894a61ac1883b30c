//! End-to-end tests for tenant isolation.
//!
//! Two organizations share every store; nothing from one may ever be
//! visible to, or mutable by, the other. Run with:
//! `cargo test --test e2e_tenancy`

#![cfg(feature = "mocks")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{NaiveDate, Utc};

use chapterhouse::actions::{RemoveMemberAction, SendCommunicationAction, SendCommunicationInput};
use chapterhouse::gateway::{
    CommunicationLog, ComplianceTask, ComplianceTaskDraft, Document, DocumentDraft, Event,
    EventDraft, FinanceKind, FinanceTransaction, FinanceTransactionDraft, MockTenantStore,
    ResourceGateway,
};
use chapterhouse::{
    CoreError, CreateMember, CreateOrganization, Identity, MemberRepository, MockAuthProvider,
    MockEmailDispatcher, MockMemberRepository, MockOrganizationRepository, MockProfileRepository,
    Organization, OrganizationRepository, PermissionMatrix, ProfileRepository, TenantResolver,
    TenantScope, UpsertProfile,
};

struct Tenants {
    orgs: MockOrganizationRepository,
    members: MockMemberRepository,
    profiles: MockProfileRepository,
    alpha: Organization,
    beta: Organization,
}

async fn tenants() -> Tenants {
    let orgs = MockOrganizationRepository::new();
    let members = MockMemberRepository::new();
    let profiles = MockProfileRepository::new();

    let mut created = Vec::new();
    for name in ["Alpha Phi Omega - Beta Chapter", "Omega Consulting Club"] {
        created.push(
            orgs.create(CreateOrganization {
                name: name.to_owned(),
                chapter_label: None,
                brand_color: None,
                contact_email: Some("board@x.edu".to_owned()),
                default_dues: None,
            })
            .await
            .unwrap(),
        );
    }
    let beta = created.pop().unwrap();
    let alpha = created.pop().unwrap();

    Tenants {
        orgs,
        members,
        profiles,
        alpha,
        beta,
    }
}

async fn scope_for(t: &Tenants, identity_id: &str, org_id: i64) -> TenantScope {
    t.profiles
        .upsert(UpsertProfile {
            identity_id: identity_id.to_owned(),
            org_id,
            full_name: "Member".to_owned(),
            role: "president".to_owned(),
            setup_complete: true,
        })
        .await
        .unwrap();

    let resolver = TenantResolver::new(t.profiles.clone(), t.orgs.clone());
    resolver
        .resolve(&Identity::new(identity_id, "member@x.edu"))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_roster_isolation() {
    let t = tenants().await;

    for (org_id, email) in [(t.alpha.id, "pres-a@x.edu"), (t.beta.id, "pres-b@x.edu")] {
        t.members
            .create(CreateMember {
                org_id,
                full_name: "President".to_owned(),
                email: email.to_owned(),
                phone: None,
                role: "president".to_owned(),
                matrix: PermissionMatrix::new(),
                major: None,
                gpa: None,
            })
            .await
            .unwrap();
    }

    let alpha_roster = t.members.list_by_org(t.alpha.id).await.unwrap();
    assert_eq!(alpha_roster.len(), 1);
    assert_eq!(alpha_roster[0].email, "pres-a@x.edu");

    // alpha's president cannot remove beta's
    let beta_pres = t
        .members
        .find_by_org_and_email(t.beta.id, "pres-b@x.edu")
        .await
        .unwrap()
        .unwrap();
    let scope = scope_for(&t, "uid-a", t.alpha.id).await;
    let result = RemoveMemberAction::new(t.members.clone(), t.profiles.clone())
        .execute(scope, "pres-a@x.edu", beta_pres.id)
        .await;
    assert_eq!(result.unwrap_err(), CoreError::MemberNotFound);
}

#[tokio::test]
async fn test_same_email_on_both_rosters_resolves_by_profile() {
    let t = tenants().await;

    for org_id in [t.alpha.id, t.beta.id] {
        t.members
            .create(CreateMember {
                org_id,
                full_name: "Shared".to_owned(),
                email: "shared@x.edu".to_owned(),
                phone: None,
                role: "member".to_owned(),
                matrix: PermissionMatrix::new(),
                major: None,
                gpa: None,
            })
            .await
            .unwrap();
    }

    // the profile pins the identity to beta, roster scan never happens
    let scope = scope_for(&t, "uid-shared", t.beta.id).await;
    assert_eq!(scope.org_id(), t.beta.id);
}

#[tokio::test]
async fn test_event_isolation_through_gateway() {
    let t = tenants().await;
    let store: MockTenantStore<Event> = MockTenantStore::new();

    let scope_a = scope_for(&t, "uid-a", t.alpha.id).await;
    let scope_b = scope_for(&t, "uid-b", t.beta.id).await;
    let gw_a = ResourceGateway::new(scope_a, store.clone());
    let gw_b = ResourceGateway::new(scope_b, store);

    let theirs = gw_b
        .create(EventDraft {
            title: "Beta retreat".to_owned(),
            description: None,
            location: None,
            starts_at: Utc::now(),
        })
        .await
        .unwrap();

    assert!(gw_a.list().await.unwrap().is_empty());
    assert!(gw_a.get(theirs.id).await.unwrap().is_none());
    assert_eq!(
        gw_a.remove(theirs.id).await.unwrap_err(),
        CoreError::RecordNotFound
    );
    assert!(gw_b.get(theirs.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_finance_and_compliance_and_document_isolation() {
    let t = tenants().await;
    let scope_a = scope_for(&t, "uid-a", t.alpha.id).await;
    let scope_b = scope_for(&t, "uid-b", t.beta.id).await;
    let due = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();

    let finances: MockTenantStore<FinanceTransaction> = MockTenantStore::new();
    let fin_b = ResourceGateway::new(scope_b, finances.clone());
    fin_b
        .create(FinanceTransactionDraft {
            kind: FinanceKind::Income,
            amount: 250.0,
            memo: "dues".to_owned(),
            occurred_on: due,
        })
        .await
        .unwrap();
    assert!(ResourceGateway::new(scope_a, finances)
        .list()
        .await
        .unwrap()
        .is_empty());

    let tasks: MockTenantStore<ComplianceTask> = MockTenantStore::new();
    let task_b = ResourceGateway::new(scope_b, tasks.clone());
    task_b
        .create(ComplianceTaskDraft {
            title: "File 990-N".to_owned(),
            due_on: due,
        })
        .await
        .unwrap();
    assert!(ResourceGateway::new(scope_a, tasks)
        .list()
        .await
        .unwrap()
        .is_empty());

    let docs: MockTenantStore<Document> = MockTenantStore::new();
    let docs_b = ResourceGateway::new(scope_b, docs.clone());
    docs_b
        .create(DocumentDraft {
            title: "Bylaws".to_owned(),
            category: None,
            url: "https://files.example/bylaws.pdf".to_owned(),
        })
        .await
        .unwrap();
    assert!(ResourceGateway::new(scope_a, docs)
        .list()
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_communication_history_isolation() {
    let t = tenants().await;
    let scope_a = scope_for(&t, "uid-a", t.alpha.id).await;
    let scope_b = scope_for(&t, "uid-b", t.beta.id).await;

    t.members
        .create(CreateMember {
            org_id: t.beta.id,
            full_name: "President".to_owned(),
            email: "pres-b@x.edu".to_owned(),
            phone: None,
            role: "president".to_owned(),
            matrix: PermissionMatrix::new(),
            major: None,
            gpa: None,
        })
        .await
        .unwrap();

    let history: MockTenantStore<CommunicationLog> = MockTenantStore::new();
    let action = SendCommunicationAction::new(
        MockEmailDispatcher::new(),
        t.members.clone(),
        ResourceGateway::new(scope_b, history.clone()),
    );
    action
        .execute(
            &t.beta,
            "pres-b@x.edu",
            SendCommunicationInput {
                recipients: vec!["a@x.edu".to_owned()],
                subject: "Hello".to_owned(),
                message: "First meeting Friday.".to_owned(),
            },
        )
        .await
        .unwrap();

    let alpha_history = ResourceGateway::new(scope_a, history);
    assert!(alpha_history.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_scope_only_obtainable_through_resolver() {
    let t = tenants().await;
    let provider = MockAuthProvider::new();
    let identity = provider.register("uid-x", "x@x.edu", "pw");

    // no profile row: no scope, no default tenant
    let resolver = TenantResolver::new(t.profiles.clone(), t.orgs.clone());
    let result = resolver.resolve(&identity).await;
    assert_eq!(result.unwrap_err(), CoreError::TenantUnresolved);
}
