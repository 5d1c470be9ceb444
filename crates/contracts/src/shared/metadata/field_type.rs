//! Field kind enumeration for the metadata system

use serde::Serialize;

/// Target of a reference field: the referenced table and its key column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefTarget {
    pub table: &'static str,
    pub column: &'static str,
}

/// Primitive kind of a column.
///
/// The set is closed: every consumer dispatches with an exhaustive `match`,
/// one arm per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
    Enum { values: &'static [&'static str] },
    Timestamp,
    Reference { target: RefTarget },
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Enum { .. } => "enum",
            Self::Timestamp => "timestamp",
            Self::Reference { .. } => "reference",
        }
    }

    /// SQLite column type used to store this kind
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Text | Self::Enum { .. } | Self::Timestamp => "TEXT",
            Self::Integer | Self::Boolean | Self::Reference { .. } => "INTEGER",
            Self::Float => "REAL",
        }
    }

    pub fn reference_target(&self) -> Option<RefTarget> {
        match self {
            Self::Reference { target } => Some(*target),
            _ => None,
        }
    }

    pub fn enum_values(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Enum { values } => Some(values),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
