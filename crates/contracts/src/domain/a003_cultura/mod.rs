use crate::shared::metadata::{EntityMetadataInfo, EntityUiMetadata, FieldMetadata};

pub const TABLE_NAME: &str = "a003_cultura";

const FIELDS: &[FieldMetadata] = &[
    FieldMetadata::id("id"),
    FieldMetadata::text("nome", 255)
        .required()
        .unique()
        .hint("Nome da Cultura"),
    FieldMetadata::text("observacao", 1000).label("Observação"),
];

/// Cultura (crop) planted in a field
pub static ENTITY: EntityMetadataInfo = EntityMetadataInfo {
    entity_index: "a003",
    entity_name: "Cultura",
    table_name: TABLE_NAME,
    primary_key: "id",
    display_field: Some("nome"),
    creation_order: 1,
    ui: EntityUiMetadata {
        element_name: "Cultura",
        list_name: "Culturas",
        menu_group: Some("Fazenda"),
        menu_order: 3,
    },
    fields: FIELDS,
};
