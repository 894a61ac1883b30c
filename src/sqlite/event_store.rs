use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::gateway::{Event, TenantStore};
use crate::{CoreError, LOG_TARGET};

/// `SQLite` store for calendar events, used through a
/// [`ResourceGateway`](crate::gateway::ResourceGateway).
///
/// Every query filters on `org_id` in addition to the tenant check the
/// gateway already performs.
#[derive(Clone)]
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct EventRecord {
    id: i64,
    org_id: i64,
    title: String,
    description: Option<String>,
    location: Option<String>,
    starts_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<EventRecord> for Event {
    fn from(row: EventRecord) -> Self {
        Event {
            id: row.id,
            org_id: row.org_id,
            title: row.title,
            description: row.description,
            location: row.location,
            starts_at: row.starts_at,
            created_at: row.created_at,
        }
    }
}

const COLUMNS: &str = "id, org_id, title, description, location, starts_at, created_at";

fn db_error(operation: &str, e: sqlx::Error) -> CoreError {
    log::error!(
        target: LOG_TARGET,
        "msg=\"database error\", operation=\"{operation}\", error=\"{e}\""
    );
    CoreError::StoreError(e.to_string())
}

#[async_trait]
impl TenantStore<Event> for SqliteEventStore {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list(&self, org_id: i64) -> Result<Vec<Event>, CoreError> {
        let rows: Vec<EventRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM events WHERE org_id = ? ORDER BY starts_at"
        ))
        .bind(org_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list_events", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn get(&self, org_id: i64, id: i64) -> Result<Option<Event>, CoreError> {
        let row: Option<EventRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM events WHERE org_id = ? AND id = ?"
        ))
        .bind(org_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("get_event", e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn insert(&self, record: Event) -> Result<Event, CoreError> {
        let row: EventRecord = sqlx::query_as(
            "INSERT INTO events (org_id, title, description, location, starts_at, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING id, org_id, title, description, location, starts_at, created_at",
        )
        .bind(record.org_id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.location)
        .bind(record.starts_at)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("insert_event", e))?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn replace(&self, record: Event) -> Result<Event, CoreError> {
        let row: Option<EventRecord> = sqlx::query_as(
            "UPDATE events SET title = ?, description = ?, location = ?, starts_at = ? \
             WHERE org_id = ? AND id = ? \
             RETURNING id, org_id, title, description, location, starts_at, created_at",
        )
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.location)
        .bind(record.starts_at)
        .bind(record.org_id)
        .bind(record.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("replace_event", e))?;

        row.map(Into::into).ok_or(CoreError::RecordNotFound)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete(&self, org_id: i64, id: i64) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM events WHERE org_id = ? AND id = ?")
            .bind(org_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_event", e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::RecordNotFound);
        }
        Ok(())
    }
}
