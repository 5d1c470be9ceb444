use axum::{extract::Path, Json};
use contracts::shared::edit_form::{EntitySummary, FieldDescriptorDto, RecordDto};

use super::ApiResult;
use crate::shared::data::db::get_connection;
use crate::shared::data::storage::Storage;
use crate::shared::metadata::get_registry;

/// GET /api/entities
pub async fn list_entities() -> Json<Vec<EntitySummary>> {
    Json(get_registry().list_all())
}

/// GET /api/entities/:entity/fields
pub async fn list_fields(Path(entity): Path<String>) -> ApiResult<Vec<FieldDescriptorDto>> {
    Ok(Json(get_registry().field_descriptors(&entity)?))
}

/// GET /api/entities/:entity/records
pub async fn list_records(Path(entity): Path<String>) -> ApiResult<Vec<RecordDto>> {
    let entity = get_registry().get(&entity)?;
    let records = Storage::new(get_connection()).list_all(entity).await?;

    Ok(Json(
        records
            .into_iter()
            .map(|record| RecordDto {
                display: record.display_string(entity.display_field),
                record,
            })
            .collect(),
    ))
}
