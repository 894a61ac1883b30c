use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// One row per authenticated identity, keyed by the auth provider's id.
///
/// The profile's stored `org_id` is the single source of tenant resolution:
/// even when an email appears on several organizations' rosters, the
/// identity belongs to exactly this tenant. `role` is a read-through cache
/// of the member row's role, refreshed on every sign-in; the evaluator
/// never reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub identity_id: String,
    pub org_id: i64,
    pub full_name: String,
    pub role: String,
    /// False forces the blocking "secure your account" gate.
    pub setup_complete: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UpsertProfile {
    pub identity_id: String,
    pub org_id: i64,
    pub full_name: String,
    pub role: String,
    pub setup_complete: bool,
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_identity(&self, identity_id: &str) -> Result<Option<Profile>, CoreError>;

    /// Inserts or fully replaces the profile for an identity.
    async fn upsert(&self, data: UpsertProfile) -> Result<Profile, CoreError>;

    async fn set_setup_complete(
        &self,
        identity_id: &str,
        setup_complete: bool,
    ) -> Result<Profile, CoreError>;

    async fn set_role(&self, identity_id: &str, role: &str) -> Result<Profile, CoreError>;

    async fn delete_by_identity(&self, identity_id: &str) -> Result<(), CoreError>;
}
