use crate::shared::metadata::{EntityMetadataInfo, EntityUiMetadata, FieldMetadata};

pub const TABLE_NAME: &str = "a001_propriedade";

const FIELDS: &[FieldMetadata] = &[
    FieldMetadata::id("id"),
    FieldMetadata::text("nome", 100).required().unique(),
    FieldMetadata::text("cnpj", 14).label("CNPJ"),
];

/// Propriedade rural (farm property)
pub static ENTITY: EntityMetadataInfo = EntityMetadataInfo {
    entity_index: "a001",
    entity_name: "Propriedade",
    table_name: TABLE_NAME,
    primary_key: "id",
    display_field: Some("nome"),
    creation_order: 1,
    ui: EntityUiMetadata {
        element_name: "Propriedade",
        list_name: "Propriedades",
        menu_group: Some("Fazenda"),
        menu_order: 1,
    },
    fields: FIELDS,
};
