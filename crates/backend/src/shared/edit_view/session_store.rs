//! Edit sessions stored as JSON, keyed by session key

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr, Statement};

use super::error::EditError;
use super::session::EditSession;

const TABLE: &str = "edit_session";

/// Sessions not touched for this long are purged
pub const SESSION_MAX_AGE_HOURS: i64 = 24;

/// Fixed-width UTC form so `updated_at` compares correctly as text
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn store_error(operation: &'static str, source: DbErr) -> EditError {
    EditError::persistence(operation, TABLE, source)
}

/// New random session key
pub fn new_session_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub async fn load_session(
    conn: &DatabaseConnection,
    session_key: &str,
) -> Result<Option<EditSession>, EditError> {
    let query = r#"
        SELECT state_json
        FROM edit_session
        WHERE session_key = ?
    "#;

    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            query,
            vec![session_key.into()],
        ))
        .await
        .map_err(|e| store_error("load_session", e))?;

    let Some(row) = row else {
        return Ok(None);
    };

    let state_json: String = row
        .try_get("", "state_json")
        .map_err(|e| store_error("load_session", e))?;

    let session = serde_json::from_str(&state_json).map_err(|e| {
        tracing::error!("Corrupt edit session {}: {}", session_key, e);
        store_error("load_session", DbErr::Json(e.to_string()))
    })?;
    Ok(Some(session))
}

pub async fn save_session(
    conn: &DatabaseConnection,
    session_key: &str,
    session: &EditSession,
) -> Result<(), EditError> {
    let state_json = serde_json::to_string(session)
        .map_err(|e| store_error("save_session", DbErr::Json(e.to_string())))?;
    let updated_at = timestamp(Utc::now());

    let query = r#"
        INSERT INTO edit_session (session_key, state_json, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(session_key) DO UPDATE SET
            state_json = excluded.state_json,
            updated_at = excluded.updated_at
    "#;

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        query,
        vec![session_key.into(), state_json.into(), updated_at.into()],
    ))
    .await
    .map_err(|e| store_error("save_session", e))?;
    Ok(())
}

/// Remove a session; true when it existed
pub async fn delete_session(conn: &DatabaseConnection, session_key: &str) -> Result<bool, EditError> {
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM edit_session WHERE session_key = ?",
            vec![session_key.into()],
        ))
        .await
        .map_err(|e| store_error("delete_session", e))?;
    Ok(result.rows_affected() > 0)
}

/// Remove sessions last saved before `cutoff`; returns how many were removed
pub async fn purge_sessions_before(
    conn: &DatabaseConnection,
    cutoff: DateTime<Utc>,
) -> Result<u64, EditError> {
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM edit_session WHERE updated_at < ?",
            vec![timestamp(cutoff).into()],
        ))
        .await
        .map_err(|e| store_error("purge_sessions", e))?;

    let purged = result.rows_affected();
    if purged > 0 {
        tracing::info!("Purged {} stale edit session(s)", purged);
    }
    Ok(purged)
}

/// Remove sessions older than `SESSION_MAX_AGE_HOURS`
pub async fn purge_stale_sessions(conn: &DatabaseConnection) -> Result<u64, EditError> {
    purge_sessions_before(conn, Utc::now() - Duration::hours(SESSION_MAX_AGE_HOURS)).await
}
