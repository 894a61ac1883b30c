#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::CoreError;

use super::organization::{
    CreateOrganization, Organization, OrganizationRepository, OrganizationUpdate,
};

#[derive(Clone)]
pub struct MockOrganizationRepository {
    orgs: Arc<RwLock<HashMap<i64, Organization>>>,
    next_id: Arc<AtomicI64>,
}

impl MockOrganizationRepository {
    pub fn new() -> Self {
        Self {
            orgs: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for MockOrganizationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrganizationRepository for MockOrganizationRepository {
    async fn create(&self, data: CreateOrganization) -> Result<Organization, CoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let org = Organization {
            id,
            name: data.name,
            chapter_label: data.chapter_label,
            brand_color: data.brand_color,
            contact_email: data.contact_email,
            default_dues: data.default_dues,
            suspended: false,
            created_at: now,
            updated_at: now,
        };

        let mut orgs = self
            .orgs
            .write()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        orgs.insert(id, org.clone());

        Ok(org)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Organization>, CoreError> {
        let orgs = self
            .orgs
            .read()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        Ok(orgs.get(&id).cloned())
    }

    async fn update(
        &self,
        id: i64,
        changes: OrganizationUpdate,
    ) -> Result<Organization, CoreError> {
        let mut orgs = self
            .orgs
            .write()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        let org = orgs.get_mut(&id).ok_or(CoreError::OrganizationNotFound)?;

        if let Some(name) = changes.name {
            org.name = name;
        }
        if let Some(label) = changes.chapter_label {
            org.chapter_label = Some(label);
        }
        if let Some(color) = changes.brand_color {
            org.brand_color = Some(color);
        }
        if let Some(email) = changes.contact_email {
            org.contact_email = Some(email);
        }
        if let Some(dues) = changes.default_dues {
            org.default_dues = Some(dues);
        }
        org.updated_at = Utc::now();

        Ok(org.clone())
    }

    async fn set_suspended(&self, id: i64, suspended: bool) -> Result<Organization, CoreError> {
        let mut orgs = self
            .orgs
            .write()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        let org = orgs.get_mut(&id).ok_or(CoreError::OrganizationNotFound)?;
        org.suspended = suspended;
        org.updated_at = Utc::now();
        Ok(org.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), CoreError> {
        let mut orgs = self
            .orgs
            .write()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        orgs.remove(&id).ok_or(CoreError::OrganizationNotFound)?;
        Ok(())
    }
}
