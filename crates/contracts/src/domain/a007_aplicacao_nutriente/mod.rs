use crate::shared::metadata::{EntityMetadataInfo, EntityUiMetadata, FieldMetadata};

use super::{a004_plantio, a005_nutriente, a006_unidade};

pub const TABLE_NAME: &str = "a007_aplicacao_nutriente";

const FIELDS: &[FieldMetadata] = &[
    FieldMetadata::id("id"),
    FieldMetadata::reference("plantio_id", a004_plantio::TABLE_NAME)
        .required()
        .label("Plantio")
        .hint("ID do plantio associado"),
    FieldMetadata::reference("nutriente_id", a005_nutriente::TABLE_NAME)
        .required()
        .label("Nutriente")
        .hint("ID do nutriente associado"),
    FieldMetadata::reference("unidade_id", a006_unidade::TABLE_NAME)
        .required()
        .label("Unidade")
        .hint("ID da unidade de medida associada"),
    FieldMetadata::timestamp("data_aplicacao")
        .required()
        .label("Data da Aplicação"),
    FieldMetadata::float("quantidade")
        .required()
        .label("Quantidade")
        .hint("Quantidade de nutriente aplicada"),
    FieldMetadata::text("observacao", 1000).label("Observação"),
];

/// Aplicação de nutriente (nutrient applied to a planting)
pub static ENTITY: EntityMetadataInfo = EntityMetadataInfo {
    entity_index: "a007",
    entity_name: "AplicacaoNutriente",
    table_name: TABLE_NAME,
    primary_key: "id",
    display_field: None,
    creation_order: 4,
    ui: EntityUiMetadata {
        element_name: "Aplicação de Nutriente",
        list_name: "Aplicações de Nutriente",
        menu_group: None,
        menu_order: EntityUiMetadata::DEFAULT_MENU_ORDER,
    },
    fields: FIELDS,
};
