use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::repository::{Profile, UpsertProfile};
use crate::{CoreError, ProfileRepository, LOG_TARGET};

#[derive(Clone)]
pub struct SqliteProfileRepository {
    pool: SqlitePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ProfileRecord {
    identity_id: String,
    org_id: i64,
    full_name: String,
    role: String,
    setup_complete: bool,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRecord> for Profile {
    fn from(row: ProfileRecord) -> Self {
        Profile {
            identity_id: row.identity_id,
            org_id: row.org_id,
            full_name: row.full_name,
            role: row.role,
            setup_complete: row.setup_complete,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "identity_id, org_id, full_name, role, setup_complete, updated_at";

fn db_error(operation: &str, e: sqlx::Error) -> CoreError {
    log::error!(
        target: LOG_TARGET,
        "msg=\"database error\", operation=\"{operation}\", error=\"{e}\""
    );
    CoreError::StoreError(e.to_string())
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_identity(&self, identity_id: &str) -> Result<Option<Profile>, CoreError> {
        let row: Option<ProfileRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM profiles WHERE identity_id = ?"
        ))
        .bind(identity_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find_profile_by_identity", e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn upsert(&self, data: UpsertProfile) -> Result<Profile, CoreError> {
        let row: ProfileRecord = sqlx::query_as(
            "INSERT INTO profiles (identity_id, org_id, full_name, role, setup_complete, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(identity_id) DO UPDATE SET \
                org_id = excluded.org_id, \
                full_name = excluded.full_name, \
                role = excluded.role, \
                setup_complete = excluded.setup_complete, \
                updated_at = excluded.updated_at \
             RETURNING identity_id, org_id, full_name, role, setup_complete, updated_at",
        )
        .bind(&data.identity_id)
        .bind(data.org_id)
        .bind(&data.full_name)
        .bind(&data.role)
        .bind(data.setup_complete)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("upsert_profile", e))?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn set_setup_complete(
        &self,
        identity_id: &str,
        setup_complete: bool,
    ) -> Result<Profile, CoreError> {
        let row: Option<ProfileRecord> = sqlx::query_as(
            "UPDATE profiles SET setup_complete = ?, updated_at = ? WHERE identity_id = ? \
             RETURNING identity_id, org_id, full_name, role, setup_complete, updated_at",
        )
        .bind(setup_complete)
        .bind(Utc::now())
        .bind(identity_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("set_profile_setup_complete", e))?;

        row.map(Into::into).ok_or(CoreError::ProfileNotFound)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, role), err))]
    async fn set_role(&self, identity_id: &str, role: &str) -> Result<Profile, CoreError> {
        let row: Option<ProfileRecord> = sqlx::query_as(
            "UPDATE profiles SET role = ?, updated_at = ? WHERE identity_id = ? \
             RETURNING identity_id, org_id, full_name, role, setup_complete, updated_at",
        )
        .bind(role)
        .bind(Utc::now())
        .bind(identity_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("set_profile_role", e))?;

        row.map(Into::into).ok_or(CoreError::ProfileNotFound)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete_by_identity(&self, identity_id: &str) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM profiles WHERE identity_id = ?")
            .bind(identity_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_profile", e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ProfileNotFound);
        }
        Ok(())
    }
}
