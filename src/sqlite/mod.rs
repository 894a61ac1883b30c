//! `SQLite` database backend implementations.
//!
//! This module provides `SQLite`-backed implementations of the repository
//! traits and the events tenant store. Enable the `sqlite` feature to use
//! them. Run [`migrations::run`] once at startup to create the schema.

mod event_store;
mod member;
pub mod migrations;
mod organization;
mod profile;

pub use event_store::SqliteEventStore;
pub use member::SqliteMemberRepository;
pub use organization::SqliteOrganizationRepository;
pub use profile::SqliteProfileRepository;

use sqlx::SqlitePool;

/// Creates all `SQLite` repository instances from a connection pool.
pub fn create_repositories(
    pool: SqlitePool,
) -> (
    SqliteOrganizationRepository,
    SqliteMemberRepository,
    SqliteProfileRepository,
) {
    (
        SqliteOrganizationRepository::new(pool.clone()),
        SqliteMemberRepository::new(pool.clone()),
        SqliteProfileRepository::new(pool),
    )
}
