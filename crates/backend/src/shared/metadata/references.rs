use contracts::shared::metadata::FieldMetadata;

use super::EntityRegistry;
use crate::shared::data::storage::Storage;
use crate::shared::edit_view::error::EditError;

/// Options of a reference field: every record of the target entity, ordered
/// by id, as `(id, display string)`.
///
/// Returns an empty list for fields that are not references.
pub async fn resolve_reference_targets(
    registry: &EntityRegistry,
    storage: &Storage<'_>,
    field: &FieldMetadata,
) -> Result<Vec<(i64, String)>, EditError> {
    let Some(target) = field.kind.reference_target() else {
        return Ok(Vec::new());
    };

    let target_entity = registry
        .get_by_table_name(target.table)
        .ok_or_else(|| EditError::EntityNotFound(target.table.to_string()))?;

    let records = storage.list_all(target_entity).await?;
    Ok(records
        .into_iter()
        .filter_map(|record| {
            let id = record.id?;
            Some((id, record.display_string(target_entity.display_field)))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_support::test_database;
    use contracts::domain::{a001_propriedade, a002_campo, a007_aplicacao_nutriente};
    use contracts::shared::record::Record;

    #[tokio::test]
    async fn test_no_targets_yields_empty_list() {
        let (conn, registry) = test_database().await;
        let storage = Storage::new(&conn);
        let field = a002_campo::ENTITY.field("propriedade_id").unwrap();

        let targets = resolve_reference_targets(&registry, &storage, field).await.unwrap();
        assert!(targets.is_empty());
    }

    #[tokio::test]
    async fn test_targets_use_display_rule() {
        let (conn, registry) = test_database().await;
        let storage = Storage::new(&conn);
        for nome in ["Fazenda Boa Vista", "Sítio Esperança"] {
            let mut record = Record::new();
            record.set("nome", nome);
            storage.insert(&a001_propriedade::ENTITY, &record).await.unwrap();
        }

        let field = a002_campo::ENTITY.field("propriedade_id").unwrap();
        let targets = resolve_reference_targets(&registry, &storage, field).await.unwrap();
        assert_eq!(
            targets,
            vec![
                (1, "1 - Fazenda Boa Vista".to_string()),
                (2, "2 - Sítio Esperança".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_non_reference_field_has_no_targets() {
        let (conn, registry) = test_database().await;
        let storage = Storage::new(&conn);
        let field = a007_aplicacao_nutriente::ENTITY.field("quantidade").unwrap();
        assert!(resolve_reference_targets(&registry, &storage, field)
            .await
            .unwrap()
            .is_empty());
    }
}
