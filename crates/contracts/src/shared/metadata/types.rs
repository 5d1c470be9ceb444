//! Core metadata types for entities and their fields
//!
//! All types use 'static lifetimes for zero-cost compile-time constants.

use serde::Serialize;

use super::field_type::{FieldKind, RefTarget};
use super::validation::ValidationRules;

// ============================================================================
// Entity-level metadata
// ============================================================================

/// Metadata for a persisted entity
/// All string fields are 'static for zero-cost compile-time access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityMetadataInfo {
    pub entity_index: &'static str,
    pub entity_name: &'static str,
    pub table_name: &'static str,
    pub primary_key: &'static str,
    /// Field rendered after the id in display strings ("{id} - {value}")
    pub display_field: Option<&'static str>,
    /// Tables are created in ascending order so reference targets exist first
    pub creation_order: u32,
    pub ui: EntityUiMetadata,
    pub fields: &'static [FieldMetadata],
}

impl EntityMetadataInfo {
    /// Non-key fields in declaration order
    pub fn editable_fields(&self) -> impl Iterator<Item = &'static FieldMetadata> + '_ {
        self.fields.iter().filter(|f| !f.primary_key)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldMetadata> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// UI metadata for entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityUiMetadata {
    pub element_name: &'static str,
    pub list_name: &'static str,
    pub menu_group: Option<&'static str>,
    pub menu_order: u32,
}

impl EntityUiMetadata {
    /// Entities without an explicit placement sort last
    pub const DEFAULT_MENU_ORDER: u32 = 100_000;
}

// ============================================================================
// Field-level metadata
// ============================================================================

/// Metadata for a single column
/// Copy trait enabled for efficient passing by value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldMetadata {
    pub name: &'static str,
    pub kind: FieldKind,
    pub primary_key: bool,
    pub ui: FieldUiMetadata,
    pub validation: ValidationRules,
}

impl FieldMetadata {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            primary_key: false,
            ui: FieldUiMetadata::EMPTY,
            validation: ValidationRules::none(),
        }
    }

    /// Auto-increment integer primary key
    pub const fn id(name: &'static str) -> Self {
        Self {
            primary_key: true,
            validation: ValidationRules::required(),
            ..Self::new(name, FieldKind::Integer)
        }
    }

    pub const fn text(name: &'static str, max_length: usize) -> Self {
        Self {
            validation: ValidationRules {
                nullable: true,
                max_length: Some(max_length),
                unique: false,
            },
            ..Self::new(name, FieldKind::Text)
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub const fn float(name: &'static str) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub const fn timestamp(name: &'static str) -> Self {
        Self::new(name, FieldKind::Timestamp)
    }

    pub const fn enumeration(name: &'static str, values: &'static [&'static str]) -> Self {
        Self::new(name, FieldKind::Enum { values })
    }

    pub const fn reference(name: &'static str, table: &'static str) -> Self {
        Self::new(
            name,
            FieldKind::Reference {
                target: RefTarget { table, column: "id" },
            },
        )
    }

    pub const fn required(self) -> Self {
        Self {
            validation: ValidationRules {
                nullable: false,
                ..self.validation
            },
            ..self
        }
    }

    pub const fn unique(self) -> Self {
        Self {
            validation: ValidationRules {
                unique: true,
                ..self.validation
            },
            ..self
        }
    }

    pub const fn label(self, label: &'static str) -> Self {
        Self {
            ui: FieldUiMetadata {
                label: Some(label),
                ..self.ui
            },
            ..self
        }
    }

    pub const fn hint(self, hint: &'static str) -> Self {
        Self {
            ui: FieldUiMetadata {
                hint: Some(hint),
                ..self.ui
            },
            ..self
        }
    }

    /// Check if field accepts null
    pub fn is_optional(&self) -> bool {
        self.validation.nullable
    }

    /// Get referenced table (for Reference)
    pub fn referenced_table(&self) -> Option<&'static str> {
        self.kind.reference_target().map(|t| t.table)
    }
}

/// UI metadata for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldUiMetadata {
    pub label: Option<&'static str>,
    pub hint: Option<&'static str>,
}

impl FieldUiMetadata {
    pub const EMPTY: Self = Self {
        label: None,
        hint: None,
    };
}

impl Default for FieldUiMetadata {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldMetadata] = &[
        FieldMetadata::id("id"),
        FieldMetadata::text("nome", 100).required().unique(),
        FieldMetadata::reference("campo_id", "a002_campo")
            .required()
            .label("Campo"),
    ];

    #[test]
    fn test_builders_compose() {
        let nome = &FIELDS[1];
        assert_eq!(nome.kind, FieldKind::Text);
        assert!(!nome.is_optional());
        assert!(nome.validation.unique);
        assert_eq!(nome.validation.max_length, Some(100));

        let campo = &FIELDS[2];
        assert_eq!(campo.referenced_table(), Some("a002_campo"));
        assert_eq!(campo.ui.label, Some("Campo"));
        assert!(!campo.is_optional());
    }

    #[test]
    fn test_id_is_primary_key() {
        assert!(FIELDS[0].primary_key);
        assert_eq!(FIELDS[0].kind, FieldKind::Integer);
        assert!(!FIELDS[1].primary_key);
    }
}
