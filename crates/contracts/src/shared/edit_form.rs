//! Form contract exchanged between the edit view and the page that draws it

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::record::{Draft, Record};

// ============================================================================
// Controls
// ============================================================================

/// Option of a select control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Widget selected for a field from its kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    Select {
        options: Vec<SelectOption>,
        selected: Option<String>,
        placeholder: Option<String>,
    },
    Number {
        value: Option<f64>,
        decimals: u8,
        step: f64,
    },
    Text {
        value: String,
        max_chars: Option<usize>,
    },
    DateTime {
        date_label: String,
        time_label: String,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    },
}

/// One rendered input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormControl {
    pub field: String,
    pub label: String,
    pub hint: Option<String>,
    pub required: bool,
    pub widget: Widget,
    /// Inline validation warning, present only while validation is shown
    pub warning: Option<String>,
}

/// Labels of the boolean select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolChoice {
    Yes,
    No,
    Undefined,
}

impl BoolChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Undefined => "Undefined",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Yes" => Some(Self::Yes),
            "No" => Some(Self::No),
            "Undefined" => Some(Self::Undefined),
            _ => None,
        }
    }

    pub fn from_value(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Yes,
            Some(false) => Self::No,
            None => Self::Undefined,
        }
    }

    /// Choices offered for a boolean column
    pub fn options(nullable: bool) -> &'static [BoolChoice] {
        if nullable {
            &[Self::Yes, Self::No, Self::Undefined]
        } else {
            &[Self::Yes, Self::No]
        }
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Raw value submitted by one control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", content = "value", rename_all = "snake_case")]
pub enum ControlInput {
    /// Selected option of an enum or boolean select
    Choice(Option<String>),
    /// Selected id of a reference select
    Reference(Option<i64>),
    Number(Option<f64>),
    Integer(Option<i64>),
    Text(String),
    DateTime {
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    },
}

/// Submitted inputs keyed by field name
pub type FormInput = BTreeMap<String, ControlInput>;

// ============================================================================
// Session state
// ============================================================================

/// Lifecycle of one edit session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditState {
    New,
    Loaded,
    Editing,
    Validating,
    Persisted,
    DeleteConfirmPending,
    Deleted,
}

impl EditState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Persisted | Self::Deleted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Loaded => "loaded",
            Self::Editing => "editing",
            Self::Validating => "validating",
            Self::Persisted => "persisted",
            Self::DeleteConfirmPending => "delete_confirm_pending",
            Self::Deleted => "deleted",
        }
    }
}

/// Answer to the delete confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmAnswer {
    Yes,
    No,
}

/// Transient navigation state of the page ("?id=..&edit=..")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationMarkers {
    pub selected_id: Option<i64>,
    pub edit: bool,
}

impl NavigationMarkers {
    pub fn clear(&mut self) {
        self.selected_id = None;
        self.edit = false;
    }

    pub fn is_clear(&self) -> bool {
        self.selected_id.is_none() && !self.edit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Message shown once at page level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

// ============================================================================
// Requests / responses
// ============================================================================

/// POST /api/forms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenFormRequest {
    pub entity: String,
    #[serde(default)]
    pub id: Option<i64>,
    /// Start a new record from a copy of this one
    #[serde(default)]
    pub copy_from: Option<i64>,
}

/// POST /api/forms/:key/render and /save
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitFormRequest {
    #[serde(default)]
    pub inputs: FormInput,
}

/// POST /api/forms/:key/confirm-delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmDeleteRequest {
    pub answer: String,
}

/// Form as returned to the page after every action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse {
    pub session_key: String,
    pub entity: String,
    pub title: String,
    pub state: EditState,
    pub record_id: Option<i64>,
    pub navigation: NavigationMarkers,
    pub controls: Vec<FormControl>,
    pub draft: Draft,
    pub page_warning: Option<String>,
    pub confirm_message: Option<String>,
    pub notices: Vec<Notice>,
}

/// Entry of GET /api/entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySummary {
    pub entity_index: String,
    pub entity_name: String,
    pub table_name: String,
    pub element_name: String,
    pub list_name: String,
    pub menu_group: Option<String>,
    pub menu_order: u32,
}

/// Entry of GET /api/entities/:entity/fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptorDto {
    pub name: String,
    pub label: String,
    pub kind: String,
    pub nullable: bool,
    pub max_length: Option<usize>,
    pub unique: bool,
    pub primary_key: bool,
    pub enum_values: Option<Vec<String>>,
    pub ref_table: Option<String>,
    pub hint: Option<String>,
}

/// Entry of GET /api/entities/:entity/records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDto {
    pub display: String,
    #[serde(flatten)]
    pub record: Record,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_options_depend_on_nullability() {
        assert_eq!(BoolChoice::options(true).len(), 3);
        assert_eq!(BoolChoice::options(false), &[BoolChoice::Yes, BoolChoice::No]);
    }

    #[test]
    fn test_bool_choice_labels_round_trip() {
        for choice in BoolChoice::options(true) {
            assert_eq!(BoolChoice::parse(choice.as_str()), Some(*choice));
        }
        assert_eq!(BoolChoice::parse("Maybe"), None);
    }

    #[test]
    fn test_control_input_json_shape() {
        let input: ControlInput =
            serde_json::from_str(r#"{"input":"reference","value":3}"#).unwrap();
        assert_eq!(input, ControlInput::Reference(Some(3)));

        let input: ControlInput = serde_json::from_str(
            r#"{"input":"date_time","value":{"date":"2024-10-01","time":null}}"#,
        )
        .unwrap();
        assert_eq!(
            input,
            ControlInput::DateTime {
                date: NaiveDate::from_ymd_opt(2024, 10, 1),
                time: None
            }
        );
    }

    #[test]
    fn test_navigation_markers_clear() {
        let mut nav = NavigationMarkers {
            selected_id: Some(4),
            edit: true,
        };
        assert!(!nav.is_clear());
        nav.clear();
        assert!(nav.is_clear());
    }
}
