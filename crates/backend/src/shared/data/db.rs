use once_cell::sync::OnceCell;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

use contracts::shared::metadata::{EntityMetadataInfo, FieldKind};

use super::storage::quote;
use crate::shared::metadata::EntityRegistry;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

pub async fn initialize_database(db_path: &std::path::Path, registry: &EntityRegistry) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_path)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Opening database at {}", absolute_path.display());
    let conn = connect(&db_url, None).await?;
    ensure_schema(&conn, registry).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Database connection already initialized"))?;
    Ok(())
}

/// Open a pooled connection; `max_connections` bounds the pool when given
pub async fn connect(db_url: &str, max_connections: Option<u32>) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(db_url.to_string());
    options.sqlx_logging(false);
    if let Some(max) = max_connections {
        options.max_connections(max).min_connections(max);
    }
    Ok(Database::connect(options).await?)
}

/// Create every missing entity table and the edit session table
pub async fn ensure_schema(conn: &DatabaseConnection, registry: &EntityRegistry) -> anyhow::Result<()> {
    for entity in registry.in_creation_order() {
        let sql = create_table_sql(entity);
        tracing::debug!("Ensuring table {}", entity.table_name);
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create table {}: {}", entity.table_name, e))?;
    }

    let create_session_table_sql = r#"
        CREATE TABLE IF NOT EXISTS edit_session (
            session_key TEXT PRIMARY KEY NOT NULL,
            state_json TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#;
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        create_session_table_sql.to_string(),
    ))
    .await?;

    tracing::info!("Database schema ready ({} entity tables)", registry.list_all().len());
    Ok(())
}

/// CREATE TABLE statement derived from the entity metadata
pub fn create_table_sql(entity: &EntityMetadataInfo) -> String {
    let mut columns = Vec::new();
    let mut foreign_keys = Vec::new();

    for field in entity.fields {
        if field.primary_key {
            columns.push(format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", quote(field.name)));
            continue;
        }

        let mut column = format!("{} {}", quote(field.name), field.kind.sql_type());
        if !field.validation.nullable {
            column.push_str(" NOT NULL");
        }
        if field.validation.unique {
            column.push_str(" UNIQUE");
        }
        columns.push(column);

        if let FieldKind::Reference { target } = field.kind {
            foreign_keys.push(format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                quote(field.name),
                quote(target.table),
                quote(target.column)
            ));
        }
    }

    columns.extend(foreign_keys);
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);",
        quote(entity.table_name),
        columns.join(",\n    ")
    )
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::{a002_campo, a003_cultura};

    #[test]
    fn test_create_table_sql_for_cultura() {
        let sql = create_table_sql(&a003_cultura::ENTITY);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"a003_cultura\""));
        assert!(sql.contains("\"id\" INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("\"nome\" TEXT NOT NULL UNIQUE"));
        assert!(sql.contains("\"observacao\" TEXT,") || sql.contains("\"observacao\" TEXT\n"));
    }

    #[test]
    fn test_create_table_sql_has_foreign_keys() {
        let sql = create_table_sql(&a002_campo::ENTITY);
        assert!(sql.contains("\"area_ha\" REAL NOT NULL"));
        assert!(sql.contains(
            "FOREIGN KEY (\"propriedade_id\") REFERENCES \"a001_propriedade\" (\"id\")"
        ));
    }
}
