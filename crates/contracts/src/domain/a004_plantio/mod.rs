use crate::shared::metadata::{EntityMetadataInfo, EntityUiMetadata, FieldMetadata};

use super::{a002_campo, a003_cultura};

pub const TABLE_NAME: &str = "a004_plantio";

const FIELDS: &[FieldMetadata] = &[
    FieldMetadata::id("id"),
    FieldMetadata::text("nome", 100).required().label("Nome"),
    FieldMetadata::reference("campo_id", a002_campo::TABLE_NAME)
        .required()
        .label("Campo"),
    FieldMetadata::reference("tipo_cultura", a003_cultura::TABLE_NAME)
        .required()
        .label("Cultura"),
    FieldMetadata::timestamp("data_inicio")
        .required()
        .label("Data de Início")
        .hint("Data em que o plantio foi realizado"),
    FieldMetadata::timestamp("data_fim")
        .label("Data de Fim")
        .hint("Data em que o plantio foi finalizado"),
    FieldMetadata::text("observacao", 1000).label("Observação"),
];

/// Plantio (planting) of a crop in a field
pub static ENTITY: EntityMetadataInfo = EntityMetadataInfo {
    entity_index: "a004",
    entity_name: "Plantio",
    table_name: TABLE_NAME,
    primary_key: "id",
    display_field: Some("nome"),
    creation_order: 3,
    ui: EntityUiMetadata {
        element_name: "Plantio",
        list_name: "Plantios",
        menu_group: Some("Fazenda"),
        menu_order: 4,
    },
    fields: FIELDS,
};
