//! Generic record storage
//!
//! Every operation opens its own transaction on the shared connection,
//! performs exactly one unit of work and commits. On any early return the
//! transaction is dropped and rolled back, so nothing is left open.

use chrono::{DateTime, Utc};
use contracts::shared::metadata::{EntityMetadataInfo, FieldKind, FieldMetadata};
use contracts::shared::record::{FieldValue, Record};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction, DbErr, QueryResult,
    Statement, TransactionTrait, Value,
};

use crate::shared::edit_view::error::EditError;

/// Storage of records of any registered entity
#[derive(Clone, Copy)]
pub struct Storage<'c> {
    conn: &'c DatabaseConnection,
}

impl<'c> Storage<'c> {
    pub fn new(conn: &'c DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn begin(
        &self,
        operation: &'static str,
        entity: &EntityMetadataInfo,
    ) -> Result<DatabaseTransaction, EditError> {
        self.conn
            .begin()
            .await
            .map_err(|e| EditError::persistence(operation, entity.table_name, e))
    }

    async fn commit(
        txn: DatabaseTransaction,
        operation: &'static str,
        entity: &EntityMetadataInfo,
    ) -> Result<(), EditError> {
        txn.commit()
            .await
            .map_err(|e| EditError::persistence(operation, entity.table_name, e))
    }

    /// Load one record by id; `NotFound` if absent
    pub async fn get_by_id(&self, entity: &EntityMetadataInfo, id: i64) -> Result<Record, EditError> {
        const OP: &str = "get_by_id";
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            column_list(entity),
            quote(entity.table_name),
            quote(entity.primary_key)
        );

        let txn = self.begin(OP, entity).await?;
        let row = txn
            .query_one(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                sql,
                vec![id.into()],
            ))
            .await
            .map_err(|e| EditError::persistence(OP, entity.table_name, e))?;
        Self::commit(txn, OP, entity).await?;

        let row = row.ok_or_else(|| EditError::NotFound {
            entity: entity.entity_name.to_string(),
            id,
        })?;
        decode_row(entity, &row).map_err(|e| EditError::persistence(OP, entity.table_name, e))
    }

    /// Load every record ordered by id
    pub async fn list_all(&self, entity: &EntityMetadataInfo) -> Result<Vec<Record>, EditError> {
        const OP: &str = "list_all";
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            column_list(entity),
            quote(entity.table_name),
            quote(entity.primary_key)
        );

        let txn = self.begin(OP, entity).await?;
        let rows = txn
            .query_all(Statement::from_string(DatabaseBackend::Sqlite, sql))
            .await
            .map_err(|e| EditError::persistence(OP, entity.table_name, e))?;
        Self::commit(txn, OP, entity).await?;

        rows.iter()
            .map(|row| decode_row(entity, row))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EditError::persistence(OP, entity.table_name, e))
    }

    /// Insert a new record and return the id assigned by storage
    pub async fn insert(&self, entity: &EntityMetadataInfo, record: &Record) -> Result<i64, EditError> {
        const OP: &str = "insert";
        let fields: Vec<&FieldMetadata> = entity.editable_fields().collect();
        let columns = fields.iter().map(|f| quote(f.name)).collect::<Vec<_>>().join(", ");
        let placeholders = vec!["?"; fields.len()].join(", ");
        let sql = if fields.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quote(entity.table_name))
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote(entity.table_name),
                columns,
                placeholders
            )
        };
        let values = fields
            .iter()
            .map(|f| encode_value(f, record.get(f.name)))
            .collect::<Vec<_>>();

        let txn = self.begin(OP, entity).await?;
        let result = txn
            .execute(Statement::from_sql_and_values(DatabaseBackend::Sqlite, sql, values))
            .await
            .map_err(|e| EditError::persistence(OP, entity.table_name, e))?;
        Self::commit(txn, OP, entity).await?;

        let id = result.last_insert_id() as i64;
        tracing::debug!("Inserted {} id={}", entity.table_name, id);
        Ok(id)
    }

    /// Overwrite every editable column of an existing record
    pub async fn update(&self, entity: &EntityMetadataInfo, record: &Record) -> Result<(), EditError> {
        const OP: &str = "update";
        let id = record.id.ok_or_else(|| {
            EditError::InvalidSessionState(format!(
                "cannot update a {} record that has no id",
                entity.entity_name
            ))
        })?;
        let fields: Vec<&FieldMetadata> = entity.editable_fields().collect();
        if fields.is_empty() {
            return Ok(());
        }
        let assignments = fields
            .iter()
            .map(|f| format!("{} = ?", quote(f.name)))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            quote(entity.table_name),
            assignments,
            quote(entity.primary_key)
        );
        let mut values = fields
            .iter()
            .map(|f| encode_value(f, record.get(f.name)))
            .collect::<Vec<_>>();
        values.push(id.into());

        let txn = self.begin(OP, entity).await?;
        let result = txn
            .execute(Statement::from_sql_and_values(DatabaseBackend::Sqlite, sql, values))
            .await
            .map_err(|e| EditError::persistence(OP, entity.table_name, e))?;
        if result.rows_affected() == 0 {
            return Err(EditError::NotFound {
                entity: entity.entity_name.to_string(),
                id,
            });
        }
        Self::commit(txn, OP, entity).await
    }

    /// Insert when the record has no id, update in place otherwise.
    /// Returns the record id.
    pub async fn upsert(&self, entity: &EntityMetadataInfo, record: &mut Record) -> Result<i64, EditError> {
        match record.id {
            Some(id) => {
                self.update(entity, record).await?;
                Ok(id)
            }
            None => {
                let id = self.insert(entity, record).await?;
                record.id = Some(id);
                Ok(id)
            }
        }
    }

    pub async fn delete(&self, entity: &EntityMetadataInfo, id: i64) -> Result<(), EditError> {
        const OP: &str = "delete";
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?",
            quote(entity.table_name),
            quote(entity.primary_key)
        );

        let txn = self.begin(OP, entity).await?;
        let result = txn
            .execute(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                sql,
                vec![id.into()],
            ))
            .await
            .map_err(|e| EditError::persistence(OP, entity.table_name, e))?;
        if result.rows_affected() == 0 {
            return Err(EditError::NotFound {
                entity: entity.entity_name.to_string(),
                id,
            });
        }
        Self::commit(txn, OP, entity).await
    }
}

pub(crate) fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn column_list(entity: &EntityMetadataInfo) -> String {
    entity
        .fields
        .iter()
        .map(|f| quote(f.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Bind value for a column; nulls are typed after the column kind
fn encode_value(field: &FieldMetadata, value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => match field.kind {
            FieldKind::Text | FieldKind::Enum { .. } | FieldKind::Timestamp => {
                Value::String(None)
            }
            FieldKind::Integer | FieldKind::Reference { .. } => Value::BigInt(None),
            FieldKind::Float => Value::Double(None),
            FieldKind::Boolean => Value::Bool(None),
        },
        FieldValue::Text(v) => v.clone().into(),
        FieldValue::Integer(v) => (*v).into(),
        FieldValue::Float(v) => (*v).into(),
        FieldValue::Boolean(v) => (*v).into(),
        FieldValue::Timestamp(v) => v.to_rfc3339().into(),
    }
}

fn decode_row(entity: &EntityMetadataInfo, row: &QueryResult) -> Result<Record, DbErr> {
    let mut record = Record::new();
    for field in entity.fields {
        let value = decode_value(field, row)?;
        if field.primary_key {
            record.id = value.as_integer();
        } else {
            record.values.insert(field.name.to_string(), value);
        }
    }
    Ok(record)
}

fn decode_value(field: &FieldMetadata, row: &QueryResult) -> Result<FieldValue, DbErr> {
    let value = match field.kind {
        FieldKind::Text | FieldKind::Enum { .. } => {
            row.try_get::<Option<String>>("", field.name)?.into()
        }
        FieldKind::Integer | FieldKind::Reference { .. } => {
            row.try_get::<Option<i64>>("", field.name)?.into()
        }
        FieldKind::Float => row.try_get::<Option<f64>>("", field.name)?.into(),
        FieldKind::Boolean => row.try_get::<Option<bool>>("", field.name)?.into(),
        FieldKind::Timestamp => match row.try_get::<Option<String>>("", field.name)? {
            Some(raw) => FieldValue::Timestamp(parse_timestamp(field, &raw)?),
            None => FieldValue::Null,
        },
    };
    Ok(value)
}

fn parse_timestamp(field: &FieldMetadata, raw: &str) -> Result<DateTime<Utc>, DbErr> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbErr::Type(format!("column '{}' holds invalid timestamp '{}': {}", field.name, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_support::test_database;
    use chrono::TimeZone;
    use contracts::domain::{a003_cultura, a008_sensor};

    #[tokio::test]
    async fn test_insert_then_get_round_trip() {
        let (conn, _registry) = test_database().await;
        let storage = Storage::new(&conn);

        let mut record = Record::new();
        record.set("nome", "Soja");
        let id = storage.insert(&a003_cultura::ENTITY, &record).await.unwrap();

        let loaded = storage.get_by_id(&a003_cultura::ENTITY, id).await.unwrap();
        assert_eq!(loaded.id, Some(id));
        assert_eq!(loaded.get("nome"), &FieldValue::from("Soja"));
        assert!(loaded.get("observacao").is_null());
    }

    #[tokio::test]
    async fn test_get_is_repeatable() {
        let (conn, _registry) = test_database().await;
        let storage = Storage::new(&conn);

        let mut record = Record::new();
        record.set("nome", "Milho");
        record.set("observacao", "Safra de verão");
        let id = storage.insert(&a003_cultura::ENTITY, &record).await.unwrap();

        let first = storage.get_by_id(&a003_cultura::ENTITY, id).await.unwrap();
        let second = storage.get_by_id(&a003_cultura::ENTITY, id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_all_kinds_survive_storage() {
        let (conn, _registry) = test_database().await;
        let storage = Storage::new(&conn);
        let installed = Utc.with_ymd_and_hms(2024, 10, 1, 8, 30, 0).unwrap();

        let mut record = Record::new();
        record.set("nome", "S-01");
        record.set("tipo", "umidade");
        record.set("intervalo_leitura_s", 60_i64);
        record.set("limiar_alerta", 1.25_f64);
        record.set("ativo", false);
        record.set("instalado_em", installed);
        let id = storage.insert(&a008_sensor::ENTITY, &record).await.unwrap();

        let loaded = storage.get_by_id(&a008_sensor::ENTITY, id).await.unwrap();
        assert_eq!(loaded.get("tipo"), &FieldValue::from("umidade"));
        assert_eq!(loaded.get("intervalo_leitura_s"), &FieldValue::Integer(60));
        assert_eq!(loaded.get("limiar_alerta"), &FieldValue::Float(1.25));
        assert_eq!(loaded.get("ativo"), &FieldValue::Boolean(false));
        assert_eq!(loaded.get("instalado_em"), &FieldValue::Timestamp(installed));
        assert!(loaded.get("plantio_id").is_null());
    }

    #[tokio::test]
    async fn test_list_all_is_ordered_by_id() {
        let (conn, _registry) = test_database().await;
        let storage = Storage::new(&conn);
        for name in ["Trigo", "Arroz", "Feijão"] {
            let mut record = Record::new();
            record.set("nome", name);
            storage.insert(&a003_cultura::ENTITY, &record).await.unwrap();
        }

        let all = storage.list_all(&a003_cultura::ENTITY).await.unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.id.unwrap()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(all[0].get("nome"), &FieldValue::from("Trigo"));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_record() {
        let (conn, _registry) = test_database().await;
        let storage = Storage::new(&conn);

        let mut ghost = Record::with_id(404);
        ghost.set("nome", "Fantasma");
        let err = storage.update(&a003_cultura::ENTITY, &ghost).await.unwrap_err();
        assert!(err.is_not_found());

        let err = storage.delete(&a003_cultura::ENTITY, 404).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unique_violation_is_persistence_failure() {
        let (conn, _registry) = test_database().await;
        let storage = Storage::new(&conn);
        let mut record = Record::new();
        record.set("nome", "Soja");
        storage.insert(&a003_cultura::ENTITY, &record).await.unwrap();

        let err = storage.insert(&a003_cultura::ENTITY, &record).await.unwrap_err();
        assert!(matches!(err, EditError::PersistenceFailure { operation: "insert", .. }));

        // the failed unit of work left nothing open behind it
        assert_eq!(storage.list_all(&a003_cultura::ENTITY).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_assigns_then_keeps_id() {
        let (conn, _registry) = test_database().await;
        let storage = Storage::new(&conn);
        let mut record = Record::new();
        record.set("nome", "Café");

        let id = storage.upsert(&a003_cultura::ENTITY, &mut record).await.unwrap();
        assert_eq!(record.id, Some(id));

        record.set("observacao", "Arábica");
        let again = storage.upsert(&a003_cultura::ENTITY, &mut record).await.unwrap();
        assert_eq!(again, id);
        assert_eq!(storage.list_all(&a003_cultura::ENTITY).await.unwrap().len(), 1);
        let loaded = storage.get_by_id(&a003_cultura::ENTITY, id).await.unwrap();
        assert_eq!(loaded.get("observacao"), &FieldValue::from("Arábica"));
    }

    #[test]
    fn test_quote_escapes_identifiers() {
        assert_eq!(quote("nome"), "\"nome\"");
        assert_eq!(quote("a\"b"), "\"a\"\"b\"");
    }
}
