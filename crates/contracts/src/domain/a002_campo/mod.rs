use crate::shared::metadata::{EntityMetadataInfo, EntityUiMetadata, FieldMetadata};

use super::a001_propriedade;

pub const TABLE_NAME: &str = "a002_campo";

const FIELDS: &[FieldMetadata] = &[
    FieldMetadata::id("id"),
    FieldMetadata::reference("propriedade_id", a001_propriedade::TABLE_NAME)
        .required()
        .label("Propriedade"),
    FieldMetadata::text("identificador", 100).required().unique(),
    FieldMetadata::float("area_ha")
        .required()
        .label("Área (HA)")
        .hint("Área do campo em hectares (HA)"),
];

/// Campo (field) inside a property
pub static ENTITY: EntityMetadataInfo = EntityMetadataInfo {
    entity_index: "a002",
    entity_name: "Campo",
    table_name: TABLE_NAME,
    primary_key: "id",
    display_field: Some("identificador"),
    creation_order: 2,
    ui: EntityUiMetadata {
        element_name: "Campo",
        list_name: "Campos",
        menu_group: Some("Fazenda"),
        menu_order: 2,
    },
    fields: FIELDS,
};
