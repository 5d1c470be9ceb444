pub mod a001_propriedade;
pub mod a002_campo;
pub mod a003_cultura;
pub mod a004_plantio;
pub mod a005_nutriente;
pub mod a006_unidade;
pub mod a007_aplicacao_nutriente;
pub mod a008_sensor;

use crate::shared::metadata::EntityMetadataInfo;

/// Every entity of the farm schema
pub static ALL_ENTITIES: &[&EntityMetadataInfo] = &[
    &a001_propriedade::ENTITY,
    &a002_campo::ENTITY,
    &a003_cultura::ENTITY,
    &a004_plantio::ENTITY,
    &a005_nutriente::ENTITY,
    &a006_unidade::ENTITY,
    &a007_aplicacao_nutriente::ENTITY,
    &a008_sensor::ENTITY,
];
