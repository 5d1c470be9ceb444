//! Helpers shared by the storage and edit-view tests

use sea_orm::DatabaseConnection;

use crate::shared::data::db::{connect, ensure_schema};
use crate::shared::metadata::EntityRegistry;

/// Fresh in-memory database with every entity table created.
///
/// The pool is pinned to a single connection: each in-memory SQLite
/// connection would otherwise see its own empty database.
pub async fn test_database() -> (DatabaseConnection, EntityRegistry) {
    let registry = EntityRegistry::new().expect("farm schema is valid");
    let conn = connect("sqlite::memory:", Some(1))
        .await
        .expect("in-memory database opens");
    ensure_schema(&conn, &registry)
        .await
        .expect("schema is created");
    (conn, registry)
}
