//! Tenant-scoped CRUD over the domain resources.
//!
//! A [`ResourceGateway`] is the only path to persisted domain records. It is
//! constructed from a [`TenantScope`] and stamps that scope onto every read
//! and write; callers never pass a tenant id, so parameter tampering cannot
//! reach another organization's rows.

mod records;

pub use records::{
    CommunicationLog, CommunicationLogDraft, ComplianceTask, ComplianceTaskDraft,
    ComplianceTaskPatch, Document, DocumentDraft, DocumentPatch, Event, EventDraft, EventPatch,
    FinanceKind, FinanceTransaction, FinanceTransactionDraft, FinanceTransactionPatch,
};

use std::marker::PhantomData;

use async_trait::async_trait;

use crate::tenant::TenantScope;
use crate::{CoreError, LOG_TARGET};

/// A domain record that belongs to exactly one organization.
pub trait TenantRecord: Clone + Send + Sync + 'static {
    /// Fields supplied on creation; the gateway adds the tenant id.
    type Draft: Send;
    /// Partial update; unset fields keep their values.
    type Patch: Send;

    fn record_id(&self) -> i64;
    fn org_id(&self) -> i64;

    /// Builds a new record inside the given scope. The store assigns the
    /// final id on insert.
    fn build(scope: TenantScope, draft: Self::Draft) -> Self;

    fn apply(&mut self, patch: Self::Patch);

    fn assign_id(&mut self, id: i64);

    /// Table/log name for this resource.
    fn resource_name() -> &'static str;
}

/// Storage boundary for one record type. Every method takes the org id the
/// gateway resolved; implementations must filter on it in addition to any
/// server-side row policy.
#[async_trait]
pub trait TenantStore<T: TenantRecord>: Send + Sync {
    async fn list(&self, org_id: i64) -> Result<Vec<T>, CoreError>;
    async fn get(&self, org_id: i64, id: i64) -> Result<Option<T>, CoreError>;
    /// Inserts and returns the record with its assigned id.
    async fn insert(&self, record: T) -> Result<T, CoreError>;
    /// Replaces an existing record matched by (org id, id).
    async fn replace(&self, record: T) -> Result<T, CoreError>;
    async fn delete(&self, org_id: i64, id: i64) -> Result<(), CoreError>;
}

/// Tenant-scoped CRUD over one resource.
pub struct ResourceGateway<T: TenantRecord, S: TenantStore<T>> {
    scope: TenantScope,
    store: S,
    _record: PhantomData<T>,
}

impl<T: TenantRecord, S: TenantStore<T>> ResourceGateway<T, S> {
    /// The scope comes from the tenant resolver; there is no constructor
    /// taking a raw org id.
    pub fn new(scope: TenantScope, store: S) -> Self {
        Self {
            scope,
            store,
            _record: PhantomData,
        }
    }

    pub fn scope(&self) -> TenantScope {
        self.scope
    }

    pub async fn list(&self) -> Result<Vec<T>, CoreError> {
        self.store.list(self.scope.org_id()).await
    }

    pub async fn get(&self, id: i64) -> Result<Option<T>, CoreError> {
        self.store.get(self.scope.org_id(), id).await
    }

    pub async fn create(&self, draft: T::Draft) -> Result<T, CoreError> {
        let record = T::build(self.scope, draft);
        let stored = self.store.insert(record).await?;
        log::info!(
            target: LOG_TARGET,
            "msg=\"record created\", resource=\"{}\", org_id={}, id={}",
            T::resource_name(),
            stored.org_id(),
            stored.record_id()
        );
        Ok(stored)
    }

    /// # Errors
    ///
    /// `CoreError::RecordNotFound` when the id does not exist in this
    /// tenant, including when it exists in another one.
    pub async fn update(&self, id: i64, patch: T::Patch) -> Result<T, CoreError> {
        let mut record = self
            .store
            .get(self.scope.org_id(), id)
            .await?
            .ok_or(CoreError::RecordNotFound)?;

        record.apply(patch);
        self.store.replace(record).await
    }

    pub async fn remove(&self, id: i64) -> Result<(), CoreError> {
        // existence check keeps deletes inside the scope
        self.store
            .get(self.scope.org_id(), id)
            .await?
            .ok_or(CoreError::RecordNotFound)?;

        self.store.delete(self.scope.org_id(), id).await?;
        log::info!(
            target: LOG_TARGET,
            "msg=\"record removed\", resource=\"{}\", org_id={}, id={}",
            T::resource_name(),
            self.scope.org_id(),
            id
        );
        Ok(())
    }
}

#[cfg(feature = "mocks")]
pub use mock::MockTenantStore;

#[cfg(feature = "mocks")]
mod mock {
    #![allow(clippy::significant_drop_tightening)]

    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::{Arc, RwLock};

    use super::*;

    /// In-memory store shared by every gateway test.
    pub struct MockTenantStore<T> {
        records: Arc<RwLock<Vec<T>>>,
        next_id: Arc<AtomicI64>,
    }

    impl<T> Clone for MockTenantStore<T> {
        fn clone(&self) -> Self {
            Self {
                records: Arc::clone(&self.records),
                next_id: Arc::clone(&self.next_id),
            }
        }
    }

    impl<T> MockTenantStore<T> {
        pub fn new() -> Self {
            Self {
                records: Arc::new(RwLock::new(Vec::new())),
                next_id: Arc::new(AtomicI64::new(1)),
            }
        }
    }

    impl<T> Default for MockTenantStore<T> {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl<T: TenantRecord> TenantStore<T> for MockTenantStore<T> {
        async fn list(&self, org_id: i64) -> Result<Vec<T>, CoreError> {
            let records = self
                .records
                .read()
                .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
            Ok(records
                .iter()
                .filter(|r| r.org_id() == org_id)
                .cloned()
                .collect())
        }

        async fn get(&self, org_id: i64, id: i64) -> Result<Option<T>, CoreError> {
            let records = self
                .records
                .read()
                .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
            Ok(records
                .iter()
                .find(|r| r.org_id() == org_id && r.record_id() == id)
                .cloned())
        }

        async fn insert(&self, mut record: T) -> Result<T, CoreError> {
            record.assign_id(self.next_id.fetch_add(1, Ordering::SeqCst));
            let mut records = self
                .records
                .write()
                .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
            records.push(record.clone());
            Ok(record)
        }

        async fn replace(&self, record: T) -> Result<T, CoreError> {
            let mut records = self
                .records
                .write()
                .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
            let slot = records
                .iter_mut()
                .find(|r| r.org_id() == record.org_id() && r.record_id() == record.record_id())
                .ok_or(CoreError::RecordNotFound)?;
            *slot = record.clone();
            Ok(record)
        }

        async fn delete(&self, org_id: i64, id: i64) -> Result<(), CoreError> {
            let mut records = self
                .records
                .write()
                .map_err(|_| CoreError::Internal("lock poisoned".into()))?;
            let before = records.len();
            records.retain(|r| !(r.org_id() == org_id && r.record_id() == id));
            if records.len() == before {
                return Err(CoreError::RecordNotFound);
            }
            Ok(())
        }
    }
}
