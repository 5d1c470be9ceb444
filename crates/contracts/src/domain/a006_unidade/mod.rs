use crate::shared::metadata::{EntityMetadataInfo, EntityUiMetadata, FieldMetadata};

pub const TABLE_NAME: &str = "a006_unidade";

const FIELDS: &[FieldMetadata] = &[
    FieldMetadata::id("id"),
    FieldMetadata::text("nome", 50)
        .required()
        .unique()
        .label("Nome")
        .hint("Nome da unidade de medida"),
    FieldMetadata::float("multiplicador")
        .required()
        .label("Multiplicador")
        .hint("Ex.: 1000 para kg, 1 para g e 0.001 para mg"),
];

/// Unidade de medida (unit of measure)
pub static ENTITY: EntityMetadataInfo = EntityMetadataInfo {
    entity_index: "a006",
    entity_name: "Unidade",
    table_name: TABLE_NAME,
    primary_key: "id",
    display_field: Some("nome"),
    creation_order: 1,
    ui: EntityUiMetadata {
        element_name: "Unidade de Medida",
        list_name: "Unidades de Medida",
        menu_group: None,
        menu_order: EntityUiMetadata::DEFAULT_MENU_ORDER,
    },
    fields: FIELDS,
};
