use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rbac::{is_privileged, PermissionMatrix};
use crate::CoreError;

/// Roster lifecycle: created `Pending` when an admin adds the entry,
/// `Active` once the invited person completes account setup, `Inactive`
/// when soft-removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Active,
    Inactive,
}

impl MemberStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberStatus::Pending => "pending",
            MemberStatus::Active => "active",
            MemberStatus::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MemberStatus::Pending),
            "active" => Some(MemberStatus::Active),
            "inactive" => Some(MemberStatus::Inactive),
            _ => None,
        }
    }
}

/// A roster entry. `org_id` is required and is what enforces isolation;
/// email is case-insensitively unique within the organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub org_id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Free text, but "admin" and "president" (any casing) are privileged.
    pub role: String,
    pub status: MemberStatus,
    /// Auth identity that completed setup for this entry. `None` until the
    /// invite is accepted; removal uses it to revoke the profile row.
    pub identity_id: Option<String>,
    pub matrix: PermissionMatrix,
    pub major: Option<String>,
    pub gpa: Option<f32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Whether this member's role bypasses the stored matrix.
    pub fn is_privileged(&self) -> bool {
        is_privileged(&self.role)
    }
}

#[derive(Debug, Clone)]
pub struct CreateMember {
    pub org_id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub matrix: PermissionMatrix,
    pub major: Option<String>,
    pub gpa: Option<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct MemberUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub major: Option<String>,
    pub gpa: Option<f32>,
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Creates a roster entry with status `Pending`.
    ///
    /// # Errors
    ///
    /// `CoreError::DuplicateEmail` when the email already exists in the
    /// organization (case-insensitive).
    async fn create(&self, data: CreateMember) -> Result<Member, CoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Member>, CoreError>;

    /// Caller resolution: exact org id, case-insensitive email.
    async fn find_by_org_and_email(
        &self,
        org_id: i64,
        email: &str,
    ) -> Result<Option<Member>, CoreError>;

    async fn list_by_org(&self, org_id: i64) -> Result<Vec<Member>, CoreError>;

    async fn update(&self, id: i64, changes: MemberUpdate) -> Result<Member, CoreError>;

    async fn update_status(&self, id: i64, status: MemberStatus) -> Result<Member, CoreError>;

    /// Records which auth identity completed setup for this entry.
    async fn link_identity(&self, id: i64, identity_id: &str) -> Result<Member, CoreError>;

    /// Persists the whole matrix as a single write. Cell-level edits are
    /// folded into the full matrix by the caller first; there are no
    /// per-cell writes.
    async fn set_matrix(&self, id: i64, matrix: &PermissionMatrix) -> Result<Member, CoreError>;

    /// Hard-deletes the roster entry. Normal removal is a status change to
    /// `Inactive` so history survives; this purges a bad row outright.
    async fn delete(&self, id: i64) -> Result<(), CoreError>;
}
