use crate::shared::metadata::{EntityMetadataInfo, EntityUiMetadata, FieldMetadata};

use super::{a004_plantio, a006_unidade};

pub const TABLE_NAME: &str = "a008_sensor";

pub const SENSOR_TYPES: &[&str] = &["temperatura", "luminosidade", "vibracao", "umidade"];

const FIELDS: &[FieldMetadata] = &[
    FieldMetadata::id("id"),
    FieldMetadata::text("nome", 100).required().unique(),
    FieldMetadata::enumeration("tipo", SENSOR_TYPES)
        .required()
        .label("Tipo"),
    FieldMetadata::reference("plantio_id", a004_plantio::TABLE_NAME).label("Plantio"),
    FieldMetadata::reference("unidade_id", a006_unidade::TABLE_NAME).label("Unidade"),
    FieldMetadata::integer("intervalo_leitura_s")
        .label("Intervalo de Leitura (s)")
        .hint("Intervalo entre leituras em segundos"),
    FieldMetadata::float("limiar_alerta")
        .label("Limiar de Alerta")
        .hint("Valor acima do qual o sensor dispara um alerta"),
    FieldMetadata::boolean("ativo").label("Ativo"),
    FieldMetadata::timestamp("instalado_em").label("Instalado em"),
];

/// Sensor installed in a planting
pub static ENTITY: EntityMetadataInfo = EntityMetadataInfo {
    entity_index: "a008",
    entity_name: "Sensor",
    table_name: TABLE_NAME,
    primary_key: "id",
    display_field: Some("nome"),
    creation_order: 5,
    ui: EntityUiMetadata {
        element_name: "Sensor",
        list_name: "Sensores",
        menu_group: Some("Monitoramento"),
        menu_order: 6,
    },
    fields: FIELDS,
};
