//! Generic edit view: renders, validates and persists one record of any
//! registered entity from its column metadata alone.

use contracts::shared::edit_form::{ConfirmAnswer, EditState, FormControl, FormInput, Notice};
use contracts::shared::metadata::{EntityMetadataInfo, FieldKind};
use contracts::shared::record::{Draft, FieldValue};
use sea_orm::DatabaseConnection;

use super::controls::{render_field, seed_input};
use super::error::EditError;
use super::session::{record_from_draft, update_from_draft, EditSession};
use super::validation;
use crate::shared::data::storage::Storage;
use crate::shared::metadata::{resolve_reference_targets, EntityRegistry};

pub const FIX_FIELDS_WARNING: &str = "Please fix the highlighted fields before saving.";

/// Controls and draft produced by one render pass
#[derive(Debug, Clone)]
pub struct RenderedForm {
    pub controls: Vec<FormControl>,
    pub draft: Draft,
    pub page_warning: Option<String>,
}

/// Result of a submit that did not fail on storage
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(i64),
    /// Failing fields with their messages
    Rejected(Vec<(String, String)>),
}

pub struct EditView<'a> {
    registry: &'a EntityRegistry,
    storage: Storage<'a>,
}

impl<'a> EditView<'a> {
    pub fn new(registry: &'a EntityRegistry, conn: &'a DatabaseConnection) -> Self {
        Self {
            registry,
            storage: Storage::new(conn),
        }
    }

    fn entity_of(&self, session: &EditSession) -> Result<&'static EntityMetadataInfo, EditError> {
        self.registry.get(&session.entity)
    }

    /// Open a form on a new record, or on the record with `id`
    pub async fn open(&self, entity_key: &str, id: Option<i64>) -> Result<EditSession, EditError> {
        let entity = self.registry.get(entity_key)?;
        match id {
            Some(id) => {
                let record = self.storage.get_by_id(entity, id).await?;
                tracing::debug!("Opened {} record {}", entity.entity_name, id);
                Ok(EditSession::loaded(entity, record))
            }
            None => Ok(EditSession::new(entity)),
        }
    }

    /// Open a form on a new record that starts as a copy of record `id`
    pub async fn duplicate(&self, entity_key: &str, id: i64) -> Result<EditSession, EditError> {
        let entity = self.registry.get(entity_key)?;
        let source = self.storage.get_by_id(entity, id).await?;
        tracing::debug!("Duplicating {} record {}", entity.entity_name, id);

        let mut session = EditSession::new(entity);
        session.record = source.duplicate();
        Ok(session)
    }

    /// Render one control per editable field and collect the draft.
    ///
    /// Fields missing from `inputs` start from the current record value.
    pub async fn render_fields(
        &self,
        session: &mut EditSession,
        inputs: &FormInput,
    ) -> Result<RenderedForm, EditError> {
        let entity = self.entity_of(session)?;
        if session.state.is_terminal() {
            session.restart();
        }

        let mut controls = Vec::new();
        let mut draft = Draft::new();
        let mut has_warnings = false;

        for field in entity.editable_fields() {
            let input = match inputs.get(field.name) {
                Some(input) => input.clone(),
                None => seed_input(field, session.record.get(field.name)),
            };

            let targets = match field.kind {
                FieldKind::Reference { .. } => {
                    resolve_reference_targets(self.registry, &self.storage, field).await?
                }
                _ => Vec::new(),
            };

            let mut rendered = render_field(field, &input, &targets);
            if session.show_validation {
                rendered.control.warning = validation::check_field(field, &rendered.value);
                has_warnings |= rendered.control.warning.is_some();
            }

            controls.push(rendered.control);
            draft.insert(field.name, rendered.value);
        }

        if matches!(session.state, EditState::New | EditState::Loaded) {
            session.state = EditState::Editing;
        }

        Ok(RenderedForm {
            controls,
            draft,
            page_warning: has_warnings.then(|| FIX_FIELDS_WARNING.to_string()),
        })
    }

    pub fn validate_field(
        &self,
        entity_key: &str,
        field_name: &str,
        value: &FieldValue,
    ) -> Result<Option<String>, EditError> {
        let entity = self.registry.get(entity_key)?;
        validation::validate_field(entity, field_name, value)
    }

    pub fn is_valid(&self, entity_key: &str, draft: &Draft) -> Result<bool, EditError> {
        let entity = self.registry.get(entity_key)?;
        validation::is_valid(entity, draft)
    }

    /// Validate the draft and save it when every field passes
    pub async fn submit(
        &self,
        session: &mut EditSession,
        draft: Draft,
    ) -> Result<SubmitOutcome, EditError> {
        let entity = self.entity_of(session)?;
        match session.state {
            EditState::New | EditState::Loaded | EditState::Editing => {}
            other => {
                return Err(EditError::InvalidSessionState(format!(
                    "cannot submit while {}",
                    other.as_str()
                )))
            }
        }

        session.state = EditState::Validating;
        let errors = match validation::collect_errors(entity, &draft) {
            Ok(errors) => errors,
            Err(e) => {
                session.state = EditState::Editing;
                return Err(e);
            }
        };

        if !errors.is_empty() {
            tracing::debug!(
                "Rejected {} draft: {} invalid field(s)",
                entity.entity_name,
                errors.len()
            );
            session.show_validation = true;
            session.push_notice(Notice::warning(FIX_FIELDS_WARNING));
            session.state = EditState::Editing;
            return Ok(SubmitOutcome::Rejected(errors));
        }

        let mut record = if session.record.is_new() {
            let mut record = match record_from_draft(entity, draft) {
                Ok(record) => record,
                Err(e) => {
                    session.state = EditState::Editing;
                    return Err(e);
                }
            };
            // values of a duplicated record the draft did not cover
            for (name, value) in &session.record.values {
                record.values.entry(name.clone()).or_insert_with(|| value.clone());
            }
            record
        } else {
            let mut record = session.record.clone();
            update_from_draft(entity, &mut record, draft);
            record
        };

        match self.storage.upsert(entity, &mut record).await {
            Ok(id) => {
                tracing::info!("Saved {} record {}", entity.entity_name, id);
                session.record = record;
                session.show_validation = false;
                session.navigation.clear();
                session.push_notice(Notice::success("Record saved successfully."));
                session.state = EditState::Persisted;
                Ok(SubmitOutcome::Saved(id))
            }
            Err(e) => {
                tracing::error!(
                    "Failed to save {} record in {}: {}",
                    entity.entity_name,
                    entity.table_name,
                    e
                );
                session.push_notice(Notice::error(format!(
                    "Failed to save the record. Check the data and try again. {}",
                    e
                )));
                session.state = EditState::Editing;
                Err(e)
            }
        }
    }

    /// Ask for confirmation before deleting the session's record
    pub fn request_delete(&self, session: &mut EditSession) -> Result<(), EditError> {
        if session.record.id.is_none() {
            session.push_notice(Notice::warning("No record selected for deletion."));
            return Ok(());
        }

        match session.state {
            EditState::Loaded | EditState::Editing => {
                session.state = EditState::DeleteConfirmPending;
                Ok(())
            }
            other => Err(EditError::InvalidSessionState(format!(
                "cannot request delete while {}",
                other.as_str()
            ))),
        }
    }

    /// Act on the answer to a pending delete
    pub async fn confirm_delete(
        &self,
        session: &mut EditSession,
        answer: ConfirmAnswer,
    ) -> Result<(), EditError> {
        let entity = self.entity_of(session)?;
        if session.state != EditState::DeleteConfirmPending {
            return Err(EditError::InvalidSessionState(format!(
                "no delete is pending (state: {})",
                session.state.as_str()
            )));
        }

        if answer == ConfirmAnswer::No {
            session.state = EditState::Editing;
            return Ok(());
        }

        let id = session.record.id.ok_or_else(|| {
            EditError::InvalidSessionState("pending delete has no record id".to_string())
        })?;

        match self.storage.delete(entity, id).await {
            Ok(()) => {
                tracing::info!("Deleted {} record {}", entity.entity_name, id);
                session.navigation.clear();
                session.push_notice(Notice::success(format!("Record {} deleted successfully.", id)));
                session.state = EditState::Deleted;
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    "Failed to delete {} record {} in {}: {}",
                    entity.entity_name,
                    id,
                    entity.table_name,
                    e
                );
                session.push_notice(Notice::error(format!("Failed to delete record {}: {}", id, e)));
                session.state = EditState::Editing;
                Err(e)
            }
        }
    }
}

/// Parse a confirmation answer ("yes" / "no", any case)
pub fn parse_answer(answer: &str) -> Result<ConfirmAnswer, EditError> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "yes" => Ok(ConfirmAnswer::Yes),
        "no" => Ok(ConfirmAnswer::No),
        other => Err(EditError::InvalidSessionState(format!(
            "unrecognized confirmation answer '{}'",
            other
        ))),
    }
}
