use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// An organization: the tenant every other record belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    /// Human label like "Gamma Chapter", shown next to the name.
    pub chapter_label: Option<String>,
    /// Hex color used for the tenant's dashboard accents.
    pub brand_color: Option<String>,
    /// Sender address for outbound communications.
    pub contact_email: Option<String>,
    /// Default dues amount pre-filled on new finance entries.
    pub default_dues: Option<f64>,
    /// A suspended organization blocks sign-in for all of its members.
    pub suspended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateOrganization {
    pub name: String,
    pub chapter_label: Option<String>,
    pub brand_color: Option<String>,
    pub contact_email: Option<String>,
    pub default_dues: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct OrganizationUpdate {
    pub name: Option<String>,
    pub chapter_label: Option<String>,
    pub brand_color: Option<String>,
    pub contact_email: Option<String>,
    pub default_dues: Option<f64>,
}

#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn create(&self, data: CreateOrganization) -> Result<Organization, CoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Organization>, CoreError>;
    async fn update(&self, id: i64, changes: OrganizationUpdate) -> Result<Organization, CoreError>;
    async fn set_suspended(&self, id: i64, suspended: bool) -> Result<Organization, CoreError>;
    /// Deleting an organization cascades to dependent records store-side.
    async fn delete(&self, id: i64) -> Result<(), CoreError>;
}
