use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::repository::{CreateOrganization, Organization, OrganizationUpdate};
use crate::{CoreError, OrganizationRepository, LOG_TARGET};

#[derive(Clone)]
pub struct SqliteOrganizationRepository {
    pool: SqlitePool,
}

impl SqliteOrganizationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct OrganizationRecord {
    id: i64,
    name: String,
    chapter_label: Option<String>,
    brand_color: Option<String>,
    contact_email: Option<String>,
    default_dues: Option<f64>,
    suspended: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrganizationRecord> for Organization {
    fn from(row: OrganizationRecord) -> Self {
        Organization {
            id: row.id,
            name: row.name,
            chapter_label: row.chapter_label,
            brand_color: row.brand_color,
            contact_email: row.contact_email,
            default_dues: row.default_dues,
            suspended: row.suspended,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "id, name, chapter_label, brand_color, contact_email, default_dues, suspended, created_at, updated_at";

fn db_error(operation: &str, e: sqlx::Error) -> CoreError {
    log::error!(
        target: LOG_TARGET,
        "msg=\"database error\", operation=\"{operation}\", error=\"{e}\""
    );
    CoreError::StoreError(e.to_string())
}

#[async_trait]
impl OrganizationRepository for SqliteOrganizationRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn create(&self, data: CreateOrganization) -> Result<Organization, CoreError> {
        let now = Utc::now();
        let row: OrganizationRecord = sqlx::query_as(
            "INSERT INTO organizations (name, chapter_label, brand_color, contact_email, default_dues, suspended, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, 0, ?, ?) \
             RETURNING id, name, chapter_label, brand_color, contact_email, default_dues, suspended, created_at, updated_at",
        )
        .bind(&data.name)
        .bind(&data.chapter_label)
        .bind(&data.brand_color)
        .bind(&data.contact_email)
        .bind(data.default_dues)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("create_organization", e))?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Organization>, CoreError> {
        let row: Option<OrganizationRecord> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM organizations WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find_organization_by_id", e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn update(&self, id: i64, changes: OrganizationUpdate) -> Result<Organization, CoreError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or(CoreError::OrganizationNotFound)?;

        let row: OrganizationRecord = sqlx::query_as(
            "UPDATE organizations SET name = ?, chapter_label = ?, brand_color = ?, contact_email = ?, default_dues = ?, updated_at = ? WHERE id = ? \
             RETURNING id, name, chapter_label, brand_color, contact_email, default_dues, suspended, created_at, updated_at",
        )
        .bind(changes.name.unwrap_or(current.name))
        .bind(changes.chapter_label.or(current.chapter_label))
        .bind(changes.brand_color.or(current.brand_color))
        .bind(changes.contact_email.or(current.contact_email))
        .bind(changes.default_dues.or(current.default_dues))
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("update_organization", e))?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn set_suspended(&self, id: i64, suspended: bool) -> Result<Organization, CoreError> {
        let row: Option<OrganizationRecord> = sqlx::query_as(
            "UPDATE organizations SET suspended = ?, updated_at = ? WHERE id = ? \
             RETURNING id, name, chapter_label, brand_color, contact_email, default_dues, suspended, created_at, updated_at",
        )
        .bind(suspended)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("set_organization_suspended", e))?;

        row.map(Into::into).ok_or(CoreError::OrganizationNotFound)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete(&self, id: i64) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_organization", e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::OrganizationNotFound);
        }
        Ok(())
    }
}
