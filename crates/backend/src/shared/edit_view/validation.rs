//! Field validation against column metadata
//!
//! Checks run in a fixed order: nullability, then type, then length. The
//! first failing check produces the message. Validation never raises; only
//! an unknown field name is an error.

use contracts::shared::metadata::{EntityMetadataInfo, FieldKind, FieldMetadata};
use contracts::shared::record::{Draft, FieldValue};

use super::error::EditError;
use crate::shared::metadata::display_label;

/// Validate a value against a field; `None` when the value is acceptable
pub fn check_field(field: &FieldMetadata, value: &FieldValue) -> Option<String> {
    let label = display_label(field);

    if value.is_null() {
        return if field.validation.nullable {
            None
        } else {
            Some(format!("Field '{}' cannot be null.", label))
        };
    }

    if !kind_accepts(&field.kind, value) {
        return Some(format!(
            "Invalid value for field '{}'. Expected: {}, got: {}.",
            label,
            field.kind,
            value.type_name()
        ));
    }

    if let FieldValue::Text(text) = value {
        if field.validation.exceeds_max_length(text) {
            return Some(format!(
                "Value too long for field '{}'. Maximum: {} characters.",
                label,
                field.validation.max_length.unwrap_or_default()
            ));
        }

        if let Some(values) = field.kind.enum_values() {
            if !values.contains(&text.as_str()) {
                return Some(format!(
                    "Invalid option for field '{}': '{}'. Options: {}.",
                    label,
                    text,
                    values.join(", ")
                ));
            }
        }
    }

    None
}

/// Whether the runtime type of `value` matches the declared kind
fn kind_accepts(kind: &FieldKind, value: &FieldValue) -> bool {
    match kind {
        FieldKind::Text | FieldKind::Enum { .. } => matches!(value, FieldValue::Text(_)),
        FieldKind::Integer | FieldKind::Reference { .. } => matches!(value, FieldValue::Integer(_)),
        FieldKind::Float => matches!(value, FieldValue::Float(_)),
        FieldKind::Boolean => matches!(value, FieldValue::Boolean(_)),
        FieldKind::Timestamp => matches!(value, FieldValue::Timestamp(_)),
    }
}

/// Validate a value for a field looked up by name
pub fn validate_field(
    entity: &EntityMetadataInfo,
    field_name: &str,
    value: &FieldValue,
) -> Result<Option<String>, EditError> {
    let field = entity
        .field(field_name)
        .ok_or_else(|| EditError::field_not_found(entity.entity_name, field_name))?;
    Ok(check_field(field, value))
}

/// True when every entry of the draft passes validation
pub fn is_valid(entity: &EntityMetadataInfo, draft: &Draft) -> Result<bool, EditError> {
    for (name, value) in draft.iter() {
        if validate_field(entity, name, value)?.is_some() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Every failing field of the draft with its message, in draft order
pub fn collect_errors(
    entity: &EntityMetadataInfo,
    draft: &Draft,
) -> Result<Vec<(String, String)>, EditError> {
    let mut errors = Vec::new();
    for (name, value) in draft.iter() {
        if let Some(message) = validate_field(entity, name, value)? {
            errors.push((name.to_string(), message));
        }
    }
    Ok(errors)
}
