use sea_orm::DbErr;
use thiserror::Error;

/// Errors of the metadata, storage and edit-view layers.
///
/// Field validation failures are not errors: they are collected as
/// messages and never raised.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("Field '{field}' not found in entity '{entity}'")]
    FieldNotFound { entity: String, field: String },

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Unsupported kind for field '{entity}.{field}': {reason}")]
    UnsupportedFieldKind {
        entity: String,
        field: String,
        reason: String,
    },

    #[error("Record {id} not found in '{entity}'")]
    NotFound { entity: String, id: i64 },

    #[error("{operation} on '{table}' failed: {source}")]
    PersistenceFailure {
        operation: &'static str,
        table: String,
        #[source]
        source: DbErr,
    },

    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),
}

impl EditError {
    pub fn field_not_found(entity: &str, field: &str) -> Self {
        Self::FieldNotFound {
            entity: entity.to_string(),
            field: field.to_string(),
        }
    }

    pub fn persistence(operation: &'static str, table: &str, source: DbErr) -> Self {
        Self::PersistenceFailure {
            operation,
            table: table.to_string(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
