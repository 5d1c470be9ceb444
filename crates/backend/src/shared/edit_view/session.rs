use contracts::shared::edit_form::{EditState, NavigationMarkers, Notice};
use contracts::shared::metadata::EntityMetadataInfo;
use contracts::shared::record::{Draft, Record};
use serde::{Deserialize, Serialize};

use super::error::EditError;

/// Edit state of one open form, kept between user actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditSession {
    /// Entity name ("Cultura")
    pub entity: String,
    pub record: Record,
    pub state: EditState,
    /// Set after a rejected submit; renders carry inline warnings while set
    pub show_validation: bool,
    pub navigation: NavigationMarkers,
    /// Notices not yet shown to the page
    #[serde(default)]
    pub notices: Vec<Notice>,
}

impl EditSession {
    /// Session for a new, unsaved record
    pub fn new(entity: &EntityMetadataInfo) -> Self {
        Self {
            entity: entity.entity_name.to_string(),
            record: Record::new(),
            state: EditState::New,
            show_validation: false,
            navigation: NavigationMarkers::default(),
            notices: Vec::new(),
        }
    }

    /// Session for a record loaded from storage
    pub fn loaded(entity: &EntityMetadataInfo, record: Record) -> Self {
        let navigation = NavigationMarkers {
            selected_id: record.id,
            edit: true,
        };
        Self {
            entity: entity.entity_name.to_string(),
            record,
            state: EditState::Loaded,
            show_validation: false,
            navigation,
            notices: Vec::new(),
        }
    }

    /// Start over with an empty record after a save or delete
    pub fn restart(&mut self) {
        self.record = Record::new();
        self.state = EditState::New;
        self.show_validation = false;
        self.navigation.clear();
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Drain the pending notices; each notice is shown once
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Question shown while a delete waits for confirmation
    pub fn confirm_message(&self) -> Option<String> {
        match (self.state, self.record.id) {
            (EditState::DeleteConfirmPending, Some(id)) => {
                Some(format!("Are you sure you want to delete record {}?", id))
            }
            _ => None,
        }
    }
}

/// Build a record from a draft; keys the entity does not declare are an error
pub fn record_from_draft(entity: &EntityMetadataInfo, draft: Draft) -> Result<Record, EditError> {
    let mut record = Record::new();
    for (name, value) in draft {
        if entity.field(&name).is_none() {
            return Err(EditError::field_not_found(entity.entity_name, &name));
        }
        record.set(name, value);
    }
    Ok(record)
}

/// Copy draft values onto an existing record, skipping unknown keys
pub fn update_from_draft(entity: &EntityMetadataInfo, record: &mut Record, draft: Draft) {
    for (name, value) in draft {
        match entity.field(&name) {
            Some(field) if !field.primary_key => record.set(name, value),
            Some(_) => {}
            None => tracing::debug!("Ignoring unknown field '{}' for {}", name, entity.entity_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a003_cultura;
    use contracts::shared::record::FieldValue;

    #[test]
    fn test_record_from_draft_rejects_unknown_field() {
        let draft = Draft::new().with("nome", "Milho").with("safra", "2024");
        let err = record_from_draft(&a003_cultura::ENTITY, draft).unwrap_err();
        assert!(matches!(err, EditError::FieldNotFound { field, .. } if field == "safra"));
    }

    #[test]
    fn test_update_from_draft_ignores_unknown_field() {
        let mut record = Record::with_id(2);
        record.set("nome", "Milho");
        let draft = Draft::new()
            .with("nome", "Milho Safrinha")
            .with("safra", "2024")
            .with("id", 99_i64);
        update_from_draft(&a003_cultura::ENTITY, &mut record, draft);

        assert_eq!(record.id, Some(2));
        assert_eq!(record.get("nome"), &FieldValue::from("Milho Safrinha"));
        assert!(record.get("safra").is_null());
        assert!(record.get("id").is_null());
    }

    #[test]
    fn test_loaded_session_sets_navigation() {
        let session = EditSession::loaded(&a003_cultura::ENTITY, Record::with_id(5));
        assert_eq!(session.navigation.selected_id, Some(5));
        assert!(session.navigation.edit);
        assert_eq!(session.state, EditState::Loaded);
    }

    #[test]
    fn test_take_notices_drains() {
        let mut session = EditSession::new(&a003_cultura::ENTITY);
        session.push_notice(Notice::success("ok"));
        assert_eq!(session.take_notices().len(), 1);
        assert!(session.take_notices().is_empty());
    }

    #[test]
    fn test_session_json_round_trip() {
        let mut record = Record::with_id(3);
        record.set("nome", "Soja");
        let mut session = EditSession::loaded(&a003_cultura::ENTITY, record);
        session.state = EditState::DeleteConfirmPending;

        let json = serde_json::to_string(&session).unwrap();
        let back: EditSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
        assert_eq!(
            back.confirm_message().as_deref(),
            Some("Are you sure you want to delete record 3?")
        );
    }
}
