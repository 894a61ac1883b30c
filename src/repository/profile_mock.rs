#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::CoreError;

use super::profile::{Profile, ProfileRepository, UpsertProfile};

#[derive(Clone)]
pub struct MockProfileRepository {
    profiles: Arc<RwLock<HashMap<String, Profile>>>,
}

impl MockProfileRepository {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MockProfileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn find_by_identity(&self, identity_id: &str) -> Result<Option<Profile>, CoreError> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        Ok(profiles.get(identity_id).cloned())
    }

    async fn upsert(&self, data: UpsertProfile) -> Result<Profile, CoreError> {
        let profile = Profile {
            identity_id: data.identity_id.clone(),
            org_id: data.org_id,
            full_name: data.full_name,
            role: data.role,
            setup_complete: data.setup_complete,
            updated_at: Utc::now(),
        };

        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        profiles.insert(data.identity_id, profile.clone());

        Ok(profile)
    }

    async fn set_setup_complete(
        &self,
        identity_id: &str,
        setup_complete: bool,
    ) -> Result<Profile, CoreError> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        let profile = profiles
            .get_mut(identity_id)
            .ok_or(CoreError::ProfileNotFound)?;
        profile.setup_complete = setup_complete;
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn set_role(&self, identity_id: &str, role: &str) -> Result<Profile, CoreError> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        let profile = profiles
            .get_mut(identity_id)
            .ok_or(CoreError::ProfileNotFound)?;
        role.clone_into(&mut profile.role);
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn delete_by_identity(&self, identity_id: &str) -> Result<(), CoreError> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        profiles.remove(identity_id);
        Ok(())
    }
}
