use crate::shared::metadata::{EntityMetadataInfo, EntityUiMetadata, FieldMetadata};

pub const TABLE_NAME: &str = "a005_nutriente";

const FIELDS: &[FieldMetadata] = &[
    FieldMetadata::id("id"),
    FieldMetadata::text("nome", 255)
        .required()
        .unique()
        .label("Nome")
        .hint("Nome do nutriente"),
    FieldMetadata::text("observacao", 1000).label("Observação"),
];

/// Nutriente (nutrient) that can be applied to a planting
pub static ENTITY: EntityMetadataInfo = EntityMetadataInfo {
    entity_index: "a005",
    entity_name: "Nutriente",
    table_name: TABLE_NAME,
    primary_key: "id",
    display_field: Some("nome"),
    creation_order: 1,
    ui: EntityUiMetadata {
        element_name: "Nutriente",
        list_name: "Nutrientes",
        menu_group: Some("Fazenda"),
        menu_order: 5,
    },
    fields: FIELDS,
};
