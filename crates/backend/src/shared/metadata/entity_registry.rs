//! Entity registry
//!
//! Central registry of every entity the edit view can work with. Entities
//! are looked up by index ("a003"), by name ("Cultura") or by storage table
//! name ("a003_cultura"); the last one lets reference fields find their
//! target without knowing which entity they point at.

use std::collections::HashMap;

use contracts::domain::ALL_ENTITIES;
use contracts::shared::edit_form::{EntitySummary, FieldDescriptorDto};
use contracts::shared::metadata::{EntityMetadataInfo, FieldKind, FieldMetadata};

use crate::shared::edit_view::error::EditError;

/// Registry of entity metadata
pub struct EntityRegistry {
    entities: Vec<&'static EntityMetadataInfo>,
    /// Index, name and table name, all pointing into `entities`
    keys: HashMap<&'static str, usize>,
    by_table: HashMap<&'static str, usize>,
}

impl EntityRegistry {
    /// Create a registry with every entity of the farm schema
    pub fn new() -> Result<Self, EditError> {
        Self::from_entities(ALL_ENTITIES)
    }

    /// Create a registry from the given entities and check their fields
    pub fn from_entities(entities: &[&'static EntityMetadataInfo]) -> Result<Self, EditError> {
        let mut registry = Self {
            entities: Vec::with_capacity(entities.len()),
            keys: HashMap::new(),
            by_table: HashMap::new(),
        };

        for &entity in entities {
            registry.register(entity);
        }

        for entity in &registry.entities {
            registry.check_fields(entity)?;
        }

        tracing::debug!("Entity registry built with {} entities", registry.entities.len());
        Ok(registry)
    }

    fn register(&mut self, entity: &'static EntityMetadataInfo) {
        let pos = self.entities.len();
        self.entities.push(entity);
        self.keys.insert(entity.entity_index, pos);
        self.keys.insert(entity.entity_name, pos);
        self.by_table.insert(entity.table_name, pos);
    }

    /// Every kind must have a rendering rule: references need a registered
    /// target and enums need at least one value
    fn check_fields(&self, entity: &EntityMetadataInfo) -> Result<(), EditError> {
        let unsupported = |field: &FieldMetadata, reason: String| EditError::UnsupportedFieldKind {
            entity: entity.entity_name.to_string(),
            field: field.name.to_string(),
            reason,
        };

        for field in entity.fields {
            match field.kind {
                FieldKind::Reference { target } => {
                    if !self.by_table.contains_key(target.table) {
                        return Err(unsupported(
                            field,
                            format!("reference target table '{}' is not registered", target.table),
                        ));
                    }
                }
                FieldKind::Enum { values } => {
                    if values.is_empty() {
                        return Err(unsupported(field, "enum declares no values".to_string()));
                    }
                }
                FieldKind::Text
                | FieldKind::Integer
                | FieldKind::Float
                | FieldKind::Boolean
                | FieldKind::Timestamp => {}
            }
        }

        if entity.field(entity.primary_key).is_none() {
            return Err(EditError::field_not_found(entity.entity_name, entity.primary_key));
        }

        Ok(())
    }

    /// List all entities, ordered by menu group and menu order
    pub fn list_all(&self) -> Vec<EntitySummary> {
        let mut entities = self.entities.clone();
        entities.sort_by(|a, b| {
            (a.ui.menu_group.is_none(), a.ui.menu_group, a.ui.menu_order, a.entity_index).cmp(&(
                b.ui.menu_group.is_none(),
                b.ui.menu_group,
                b.ui.menu_order,
                b.entity_index,
            ))
        });

        entities
            .into_iter()
            .map(|e| EntitySummary {
                entity_index: e.entity_index.to_string(),
                entity_name: e.entity_name.to_string(),
                table_name: e.table_name.to_string(),
                element_name: e.ui.element_name.to_string(),
                list_name: e.ui.list_name.to_string(),
                menu_group: e.ui.menu_group.map(str::to_string),
                menu_order: e.ui.menu_order,
            })
            .collect()
    }

    /// Entities in table-creation order
    pub fn in_creation_order(&self) -> Vec<&'static EntityMetadataInfo> {
        let mut entities = self.entities.clone();
        entities.sort_by_key(|e| (e.creation_order, e.entity_index));
        entities
    }

    /// Get entity by index, name or table name
    pub fn get(&self, key: &str) -> Result<&'static EntityMetadataInfo, EditError> {
        self.keys
            .get(key)
            .or_else(|| self.by_table.get(key))
            .map(|&pos| self.entities[pos])
            .ok_or_else(|| EditError::EntityNotFound(key.to_string()))
    }

    /// Get entity by storage table name
    pub fn get_by_table_name(&self, table_name: &str) -> Option<&'static EntityMetadataInfo> {
        self.by_table.get(table_name).map(|&pos| self.entities[pos])
    }

    /// Ordered fields of an entity, primary key included
    pub fn fields(&self, entity: &str) -> Result<&'static [FieldMetadata], EditError> {
        Ok(self.get(entity)?.fields)
    }

    pub fn get_field(
        &self,
        entity: &str,
        field_name: &str,
    ) -> Result<&'static FieldMetadata, EditError> {
        let meta = self.get(entity)?;
        meta.field(field_name)
            .ok_or_else(|| EditError::field_not_found(meta.entity_name, field_name))
    }

    /// Display label of a field looked up by name
    pub fn field_display_label(&self, entity: &str, field_name: &str) -> Result<String, EditError> {
        Ok(display_label(self.get_field(entity, field_name)?))
    }

    pub fn field_descriptors(&self, entity: &str) -> Result<Vec<FieldDescriptorDto>, EditError> {
        Ok(self
            .fields(entity)?
            .iter()
            .map(|f| FieldDescriptorDto {
                name: f.name.to_string(),
                label: display_label(f),
                kind: f.kind.as_str().to_string(),
                nullable: f.validation.nullable,
                max_length: f.validation.max_length,
                unique: f.validation.unique,
                primary_key: f.primary_key,
                enum_values: f
                    .kind
                    .enum_values()
                    .map(|values| values.iter().map(|v| v.to_string()).collect()),
                ref_table: f.referenced_table().map(str::to_string),
                hint: f.ui.hint.map(str::to_string),
            })
            .collect())
    }
}

/// Configured label of a field, or its name title-cased ("area_ha" -> "Area Ha")
pub fn display_label(field: &FieldMetadata) -> String {
    match field.ui.label {
        Some(label) => label.to_string(),
        None => title_case(field.name),
    }
}

fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::{a002_campo, a003_cultura};
    use contracts::shared::metadata::EntityUiMetadata;

    #[test]
    fn test_lookup_by_index_name_and_table() {
        let registry = EntityRegistry::new().unwrap();
        assert_eq!(registry.get("a003").unwrap().entity_name, "Cultura");
        assert_eq!(registry.get("Cultura").unwrap().entity_index, "a003");
        assert_eq!(registry.get("a003_cultura").unwrap().entity_index, "a003");
        assert_eq!(
            registry.get_by_table_name(a002_campo::TABLE_NAME).unwrap().entity_name,
            "Campo"
        );
        assert!(matches!(
            registry.get("Trator"),
            Err(EditError::EntityNotFound(_))
        ));
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let registry = EntityRegistry::new().unwrap();
        let names: Vec<_> = registry
            .fields("Cultura")
            .unwrap()
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["id", "nome", "observacao"]);
    }

    #[test]
    fn test_get_field_unknown_name() {
        let registry = EntityRegistry::new().unwrap();
        let err = registry.get_field("Cultura", "preco").unwrap_err();
        assert!(matches!(err, EditError::FieldNotFound { .. }));
        assert!(err.to_string().contains("preco"));
    }

    #[test]
    fn test_display_label() {
        let registry = EntityRegistry::new().unwrap();
        assert_eq!(registry.field_display_label("Cultura", "observacao").unwrap(), "Observação");
        assert_eq!(registry.field_display_label("Cultura", "nome").unwrap(), "Nome");
        assert_eq!(registry.field_display_label("Campo", "identificador").unwrap(), "Identificador");
        assert_eq!(title_case("propriedade_id"), "Propriedade Id");
    }

    #[test]
    fn test_menu_order() {
        let registry = EntityRegistry::new().unwrap();
        let names: Vec<_> = registry
            .list_all()
            .into_iter()
            .map(|e| e.entity_name)
            .collect();
        assert_eq!(&names[..5], &["Propriedade", "Campo", "Cultura", "Plantio", "Nutriente"]);
        assert_eq!(names[5], "Sensor");
        // entities without a menu group come last
        assert_eq!(&names[6..], &["Unidade", "AplicacaoNutriente"]);
    }

    #[test]
    fn test_creation_order_puts_targets_first() {
        let registry = EntityRegistry::new().unwrap();
        let order: Vec<_> = registry
            .in_creation_order()
            .into_iter()
            .map(|e| e.table_name)
            .collect();
        let pos = |t: &str| order.iter().position(|x| *x == t).unwrap();
        assert!(pos("a001_propriedade") < pos("a002_campo"));
        assert!(pos("a002_campo") < pos("a004_plantio"));
        assert!(pos("a004_plantio") < pos("a007_aplicacao_nutriente"));
    }

    const DANGLING_FIELDS: &[FieldMetadata] = &[
        FieldMetadata::id("id"),
        FieldMetadata::reference("trator_id", "a999_trator").required(),
    ];

    const DANGLING: EntityMetadataInfo = EntityMetadataInfo {
        entity_index: "t001",
        entity_name: "Garagem",
        table_name: "t001_garagem",
        primary_key: "id",
        display_field: None,
        creation_order: 1,
        ui: EntityUiMetadata {
            element_name: "Garagem",
            list_name: "Garagens",
            menu_group: None,
            menu_order: EntityUiMetadata::DEFAULT_MENU_ORDER,
        },
        fields: DANGLING_FIELDS,
    };

    const EMPTY_ENUM_FIELDS: &[FieldMetadata] = &[
        FieldMetadata::id("id"),
        FieldMetadata::enumeration("estado", &[]),
    ];

    const EMPTY_ENUM: EntityMetadataInfo = EntityMetadataInfo {
        entity_index: "t002",
        entity_name: "Silo",
        table_name: "t002_silo",
        fields: EMPTY_ENUM_FIELDS,
        ..DANGLING
    };

    #[test]
    fn test_reference_to_unregistered_table_is_rejected() {
        let err = EntityRegistry::from_entities(&[&DANGLING]).err().unwrap();
        assert!(matches!(err, EditError::UnsupportedFieldKind { .. }));
        assert!(err.to_string().contains("a999_trator"));
    }

    #[test]
    fn test_empty_enum_is_rejected() {
        let err = EntityRegistry::from_entities(&[&EMPTY_ENUM]).err().unwrap();
        assert!(matches!(err, EditError::UnsupportedFieldKind { .. }));
    }

    #[test]
    fn test_registry_accepts_self_contained_subset() {
        let registry = EntityRegistry::from_entities(&[&a003_cultura::ENTITY]).unwrap();
        assert_eq!(registry.list_all().len(), 1);
    }
}
