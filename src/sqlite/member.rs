use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::rbac::PermissionMatrix;
use crate::repository::{CreateMember, Member, MemberStatus, MemberUpdate};
use crate::{CoreError, MemberRepository, LOG_TARGET};

#[derive(Clone)]
pub struct SqliteMemberRepository {
    pool: SqlitePool,
}

impl SqliteMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct MemberRecord {
    id: i64,
    org_id: i64,
    full_name: String,
    email: String,
    phone: Option<String>,
    role: String,
    status: String,
    identity_id: Option<String>,
    matrix: String,
    major: Option<String>,
    gpa: Option<f32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MemberRecord> for Member {
    fn from(row: MemberRecord) -> Self {
        Member {
            id: row.id,
            org_id: row.org_id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            role: row.role,
            // unknown text reads as pending, the most restrictive state
            status: MemberStatus::parse(&row.status).unwrap_or(MemberStatus::Pending),
            identity_id: row.identity_id,
            matrix: PermissionMatrix::from_json(&row.matrix).unwrap_or_default(),
            major: row.major,
            gpa: row.gpa,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str =
    "id, org_id, full_name, email, phone, role, status, identity_id, matrix, major, gpa, created_at, updated_at";

fn db_error(operation: &str, e: sqlx::Error) -> CoreError {
    if e.as_database_error()
        .is_some_and(|d| d.is_unique_violation())
    {
        return CoreError::DuplicateEmail;
    }
    log::error!(
        target: LOG_TARGET,
        "msg=\"database error\", operation=\"{operation}\", error=\"{e}\""
    );
    CoreError::StoreError(e.to_string())
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn create(&self, data: CreateMember) -> Result<Member, CoreError> {
        let now = Utc::now();
        let row: MemberRecord = sqlx::query_as(
            "INSERT INTO members (org_id, full_name, email, phone, role, status, matrix, major, gpa, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, 'pending', ?, ?, ?, ?, ?) \
             RETURNING id, org_id, full_name, email, phone, role, status, identity_id, matrix, major, gpa, created_at, updated_at",
        )
        .bind(data.org_id)
        .bind(&data.full_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.role)
        .bind(data.matrix.to_json())
        .bind(&data.major)
        .bind(data.gpa)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("create_member", e))?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Member>, CoreError> {
        let row: Option<MemberRecord> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM members WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find_member_by_id", e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, email), err))]
    async fn find_by_org_and_email(
        &self,
        org_id: i64,
        email: &str,
    ) -> Result<Option<Member>, CoreError> {
        let row: Option<MemberRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM members WHERE org_id = ? AND lower(email) = lower(?)"
        ))
        .bind(org_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find_member_by_org_and_email", e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list_by_org(&self, org_id: i64) -> Result<Vec<Member>, CoreError> {
        let rows: Vec<MemberRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM members WHERE org_id = ? ORDER BY id"
        ))
        .bind(org_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list_members_by_org", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn update(&self, id: i64, changes: MemberUpdate) -> Result<Member, CoreError> {
        let current = self.find_by_id(id).await?.ok_or(CoreError::MemberNotFound)?;

        let row: MemberRecord = sqlx::query_as(
            "UPDATE members SET full_name = ?, phone = ?, role = ?, major = ?, gpa = ?, updated_at = ? WHERE id = ? \
             RETURNING id, org_id, full_name, email, phone, role, status, identity_id, matrix, major, gpa, created_at, updated_at",
        )
        .bind(changes.full_name.unwrap_or(current.full_name))
        .bind(changes.phone.or(current.phone))
        .bind(changes.role.unwrap_or(current.role))
        .bind(changes.major.or(current.major))
        .bind(changes.gpa.or(current.gpa))
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("update_member", e))?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn update_status(&self, id: i64, status: MemberStatus) -> Result<Member, CoreError> {
        let row: Option<MemberRecord> = sqlx::query_as(
            "UPDATE members SET status = ?, updated_at = ? WHERE id = ? \
             RETURNING id, org_id, full_name, email, phone, role, status, identity_id, matrix, major, gpa, created_at, updated_at",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("update_member_status", e))?;

        row.map(Into::into).ok_or(CoreError::MemberNotFound)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, identity_id), err))]
    async fn link_identity(&self, id: i64, identity_id: &str) -> Result<Member, CoreError> {
        let row: Option<MemberRecord> = sqlx::query_as(
            "UPDATE members SET identity_id = ?, updated_at = ? WHERE id = ? \
             RETURNING id, org_id, full_name, email, phone, role, status, identity_id, matrix, major, gpa, created_at, updated_at",
        )
        .bind(identity_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("link_member_identity", e))?;

        row.map(Into::into).ok_or(CoreError::MemberNotFound)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn set_matrix(&self, id: i64, matrix: &PermissionMatrix) -> Result<Member, CoreError> {
        let row: Option<MemberRecord> = sqlx::query_as(
            "UPDATE members SET matrix = ?, updated_at = ? WHERE id = ? \
             RETURNING id, org_id, full_name, email, phone, role, status, identity_id, matrix, major, gpa, created_at, updated_at",
        )
        .bind(matrix.to_json())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("set_member_matrix", e))?;

        row.map(Into::into).ok_or(CoreError::MemberNotFound)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete(&self, id: i64) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_member", e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::MemberNotFound);
        }
        Ok(())
    }
}
