#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::rbac::PermissionMatrix;
use crate::CoreError;

use super::member::{CreateMember, Member, MemberRepository, MemberStatus, MemberUpdate};

#[derive(Clone)]
pub struct MockMemberRepository {
    members: Arc<RwLock<HashMap<i64, Member>>>,
    next_id: Arc<AtomicI64>,
}

impl MockMemberRepository {
    pub fn new() -> Self {
        Self {
            members: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for MockMemberRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberRepository for MockMemberRepository {
    async fn create(&self, data: CreateMember) -> Result<Member, CoreError> {
        let mut members = self
            .members
            .write()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;

        let duplicate = members.values().any(|m| {
            m.org_id == data.org_id && m.email.eq_ignore_ascii_case(&data.email)
        });
        if duplicate {
            return Err(CoreError::DuplicateEmail);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let member = Member {
            id,
            org_id: data.org_id,
            full_name: data.full_name,
            email: data.email,
            phone: data.phone,
            role: data.role,
            status: MemberStatus::Pending,
            identity_id: None,
            matrix: data.matrix,
            major: data.major,
            gpa: data.gpa,
            created_at: now,
            updated_at: now,
        };
        members.insert(id, member.clone());

        Ok(member)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Member>, CoreError> {
        let members = self
            .members
            .read()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        Ok(members.get(&id).cloned())
    }

    async fn find_by_org_and_email(
        &self,
        org_id: i64,
        email: &str,
    ) -> Result<Option<Member>, CoreError> {
        let members = self
            .members
            .read()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        Ok(members
            .values()
            .find(|m| m.org_id == org_id && m.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_by_org(&self, org_id: i64) -> Result<Vec<Member>, CoreError> {
        let members = self
            .members
            .read()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        let mut rows: Vec<Member> = members
            .values()
            .filter(|m| m.org_id == org_id)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.id);
        Ok(rows)
    }

    async fn update(&self, id: i64, changes: MemberUpdate) -> Result<Member, CoreError> {
        let mut members = self
            .members
            .write()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        let member = members.get_mut(&id).ok_or(CoreError::MemberNotFound)?;

        if let Some(full_name) = changes.full_name {
            member.full_name = full_name;
        }
        if let Some(phone) = changes.phone {
            member.phone = Some(phone);
        }
        if let Some(role) = changes.role {
            member.role = role;
        }
        if let Some(major) = changes.major {
            member.major = Some(major);
        }
        if let Some(gpa) = changes.gpa {
            member.gpa = Some(gpa);
        }
        member.updated_at = Utc::now();

        Ok(member.clone())
    }

    async fn update_status(&self, id: i64, status: MemberStatus) -> Result<Member, CoreError> {
        let mut members = self
            .members
            .write()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        let member = members.get_mut(&id).ok_or(CoreError::MemberNotFound)?;
        member.status = status;
        member.updated_at = Utc::now();
        Ok(member.clone())
    }

    async fn link_identity(&self, id: i64, identity_id: &str) -> Result<Member, CoreError> {
        let mut members = self
            .members
            .write()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        let member = members.get_mut(&id).ok_or(CoreError::MemberNotFound)?;
        member.identity_id = Some(identity_id.to_owned());
        member.updated_at = Utc::now();
        Ok(member.clone())
    }

    async fn set_matrix(&self, id: i64, matrix: &PermissionMatrix) -> Result<Member, CoreError> {
        let mut members = self
            .members
            .write()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        let member = members.get_mut(&id).ok_or(CoreError::MemberNotFound)?;
        member.matrix = matrix.clone();
        member.updated_at = Utc::now();
        Ok(member.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), CoreError> {
        let mut members = self
            .members
            .write()
            .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
        members.remove(&id).ok_or(CoreError::MemberNotFound)?;
        Ok(())
    }
}
