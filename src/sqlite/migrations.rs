//! Embedded database migrations for `SQLite`.
//!
//! Migrations are embedded at compile time and run programmatically,
//! tracked in the `_chapterhouse_migrations` table.
//!
//! # Example
//!
//! ```rust,ignore
//! use chapterhouse::sqlite::migrations;
//! use sqlx::SqlitePool;
//!
//! async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
//!     migrations::run(pool).await?;
//!     Ok(())
//! }
//! ```

use sqlx::{Executor, SqlitePool};

const MIGRATIONS: &[(&str, &str)] = &[
    (
        "20250301000001_create_organizations_table",
        include_str!("../../migrations_sqlite/20250301000001_create_organizations_table.sql"),
    ),
    (
        "20250301000002_create_members_table",
        include_str!("../../migrations_sqlite/20250301000002_create_members_table.sql"),
    ),
    (
        "20250301000003_create_profiles_table",
        include_str!("../../migrations_sqlite/20250301000003_create_profiles_table.sql"),
    ),
    (
        "20250301000004_create_events_table",
        include_str!("../../migrations_sqlite/20250301000004_create_events_table.sql"),
    ),
];

/// Runs all database migrations.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    pool.execute(
        r"
        CREATE TABLE IF NOT EXISTS _chapterhouse_migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .await?;

    for (name, sql) in MIGRATIONS {
        let applied: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM _chapterhouse_migrations WHERE name = ?)",
        )
        .bind(*name)
        .fetch_one(pool)
        .await?;

        if !applied {
            // SQLite runs one statement per execute, so split on semicolons.
            // The bundled migrations contain none inside string literals.
            for statement in sql.split(';') {
                let trimmed = statement.trim();
                if !trimmed.is_empty() {
                    pool.execute(trimmed).await?;
                }
            }

            sqlx::query("INSERT INTO _chapterhouse_migrations (name) VALUES (?)")
                .bind(*name)
                .execute(pool)
                .await?;
        }
    }

    Ok(())
}
