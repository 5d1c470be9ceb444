//! Control selection and input coercion, one arm per field kind

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use contracts::shared::edit_form::{BoolChoice, ControlInput, FormControl, SelectOption, Widget};
use contracts::shared::metadata::{FieldKind, FieldMetadata};
use contracts::shared::record::FieldValue;

use crate::shared::metadata::display_label;

/// A rendered control and the value it contributes to the draft
pub struct RenderedField {
    pub control: FormControl,
    pub value: FieldValue,
}

/// Input a control starts from when the page submitted nothing for it
pub fn seed_input(field: &FieldMetadata, current: &FieldValue) -> ControlInput {
    match field.kind {
        FieldKind::Reference { .. } => ControlInput::Reference(current.as_integer()),
        FieldKind::Enum { .. } => ControlInput::Choice(current.as_text().map(str::to_string)),
        FieldKind::Float => ControlInput::Number(match current {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(v) => Some(*v as f64),
            _ => None,
        }),
        FieldKind::Integer => ControlInput::Integer(current.as_integer()),
        FieldKind::Boolean => {
            let choice = BoolChoice::from_value(current.as_bool());
            ControlInput::Choice(Some(choice.as_str().to_string()))
        }
        FieldKind::Text => {
            ControlInput::Text(current.as_text().map(str::to_string).unwrap_or_default())
        }
        FieldKind::Timestamp => {
            let ts = current.as_timestamp();
            ControlInput::DateTime {
                date: ts.map(|t| t.date_naive()),
                time: ts.map(|t| t.time()),
            }
        }
    }
}

/// Build the control for `field` from `input` and coerce the input into a
/// draft value.
///
/// `targets` are the resolved options of a reference field and are ignored
/// for other kinds.
pub fn render_field(
    field: &FieldMetadata,
    input: &ControlInput,
    targets: &[(i64, String)],
) -> RenderedField {
    let label = display_label(field);
    let (widget, value) = match field.kind {
        FieldKind::Reference { .. } => reference_control(input, targets),
        FieldKind::Enum { values } => enum_control(input, values),
        FieldKind::Float => float_control(input),
        FieldKind::Integer => integer_control(input),
        FieldKind::Boolean => boolean_control(input, field.validation.nullable),
        FieldKind::Text => text_control(input, field.validation.max_length),
        FieldKind::Timestamp => timestamp_control(input, &label),
    };

    RenderedField {
        control: FormControl {
            field: field.name.to_string(),
            label,
            hint: field.ui.hint.map(str::to_string),
            required: !field.validation.nullable,
            widget,
            warning: None,
        },
        value,
    }
}

/// Value carried into the draft when an input does not fit the control,
/// so validation can report the mismatch
fn raw_value(input: &ControlInput) -> FieldValue {
    match input {
        ControlInput::Choice(v) => v.clone().into(),
        ControlInput::Reference(v) => (*v).into(),
        ControlInput::Number(v) => (*v).into(),
        ControlInput::Integer(v) => (*v).into(),
        ControlInput::Text(v) if v.is_empty() => FieldValue::Null,
        ControlInput::Text(v) => v.clone().into(),
        ControlInput::DateTime { date, time } => combine(*date, *time).into(),
    }
}

fn combine(date: Option<NaiveDate>, time: Option<NaiveTime>) -> Option<chrono::DateTime<Utc>> {
    match (date, time) {
        (Some(d), Some(t)) => Some(Utc.from_utc_datetime(&d.and_time(t))),
        _ => None,
    }
}

fn reference_control(input: &ControlInput, targets: &[(i64, String)]) -> (Widget, FieldValue) {
    let options = targets
        .iter()
        .map(|(id, display)| SelectOption::new(id.to_string(), display.clone()))
        .collect();

    let value = match input {
        // an id outside the listed targets cannot be selected
        ControlInput::Reference(Some(id)) if targets.iter().any(|(t, _)| t == id) => {
            FieldValue::Integer(*id)
        }
        ControlInput::Reference(_) => FieldValue::Null,
        other => raw_value(other),
    };

    let selected = value.as_integer().map(|id| id.to_string());
    (
        Widget::Select {
            options,
            selected,
            placeholder: None,
        },
        value,
    )
}

fn enum_control(input: &ControlInput, values: &[&str]) -> (Widget, FieldValue) {
    let options = values
        .iter()
        .map(|v| SelectOption::new(*v, *v))
        .collect();

    let value = match input {
        ControlInput::Choice(choice) => choice.clone().into(),
        other => raw_value(other),
    };

    let selected = value
        .as_text()
        .filter(|v| values.contains(v))
        .map(str::to_string);
    (
        Widget::Select {
            options,
            selected,
            placeholder: Some("Choose an option".to_string()),
        },
        value,
    )
}

fn float_control(input: &ControlInput) -> (Widget, FieldValue) {
    let value = match input {
        ControlInput::Number(v) => (*v).into(),
        ControlInput::Integer(v) => v.map(|i| i as f64).into(),
        other => raw_value(other),
    };

    let shown = match value {
        FieldValue::Float(v) => Some(v),
        _ => None,
    };
    (
        Widget::Number {
            value: shown,
            decimals: 2,
            step: 0.01,
        },
        value,
    )
}

fn integer_control(input: &ControlInput) -> (Widget, FieldValue) {
    let value = match input {
        ControlInput::Integer(v) => (*v).into(),
        // 2^63 is the first float past i64::MAX; larger values stay floats
        ControlInput::Number(Some(v)) if v.fract() == 0.0 && fits_i64(*v) => {
            FieldValue::Integer(*v as i64)
        }
        other => raw_value(other),
    };

    let shown = value.as_integer().map(|v| v as f64);
    (
        Widget::Number {
            value: shown,
            decimals: 0,
            step: 1.0,
        },
        value,
    )
}

fn fits_i64(v: f64) -> bool {
    (i64::MIN as f64..i64::MAX as f64).contains(&v)
}

fn boolean_control(input: &ControlInput, nullable: bool) -> (Widget, FieldValue) {
    let offered = BoolChoice::options(nullable);
    let options = offered
        .iter()
        .map(|c| SelectOption::new(c.as_str(), c.as_str()))
        .collect();

    let (selected, value) = match input {
        ControlInput::Choice(Some(label)) => match BoolChoice::parse(label) {
            Some(choice) if offered.contains(&choice) => {
                let value = match choice {
                    BoolChoice::Yes => FieldValue::Boolean(true),
                    BoolChoice::No => FieldValue::Boolean(false),
                    BoolChoice::Undefined => FieldValue::Null,
                };
                (Some(choice.as_str().to_string()), value)
            }
            // "Undefined" on a non-nullable column leaves nothing selected
            Some(_) => (None, FieldValue::Null),
            None => (None, FieldValue::Text(label.clone())),
        },
        ControlInput::Choice(None) => (None, FieldValue::Null),
        other => (None, raw_value(other)),
    };

    (
        Widget::Select {
            options,
            selected,
            placeholder: None,
        },
        value,
    )
}

fn text_control(input: &ControlInput, max_length: Option<usize>) -> (Widget, FieldValue) {
    let value = raw_value(input);
    let shown = match &value {
        FieldValue::Text(v) => v.clone(),
        _ => String::new(),
    };
    (
        Widget::Text {
            value: shown,
            max_chars: max_length,
        },
        value,
    )
}

fn timestamp_control(input: &ControlInput, label: &str) -> (Widget, FieldValue) {
    let (date, time, value) = match input {
        ControlInput::DateTime { date, time } => (*date, *time, combine(*date, *time).into()),
        other => (None, None, raw_value(other)),
    };
    (
        Widget::DateTime {
            date_label: format!("{} - Date", label),
            time_label: format!("{} - Time", label),
            date,
            time,
        },
        value,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::{a002_campo, a004_plantio, a008_sensor};

    fn field(entity: &'static contracts::shared::metadata::EntityMetadataInfo, name: &str) -> &'static FieldMetadata {
        entity.field(name).unwrap()
    }

    #[test]
    fn test_reference_with_no_targets_is_null() {
        let f = field(&a002_campo::ENTITY, "propriedade_id");
        let rendered = render_field(f, &ControlInput::Reference(Some(1)), &[]);
        assert_eq!(rendered.value, FieldValue::Null);
        match rendered.control.widget {
            Widget::Select { options, selected, .. } => {
                assert!(options.is_empty());
                assert_eq!(selected, None);
            }
            other => panic!("unexpected widget {:?}", other),
        }
        assert_eq!(rendered.control.label, "Propriedade");
        assert!(rendered.control.required);
    }

    #[test]
    fn test_reference_selects_listed_target() {
        let f = field(&a002_campo::ENTITY, "propriedade_id");
        let targets = vec![(3, "3 - Boa Vista".to_string()), (5, "5 - Esperança".to_string())];
        let rendered = render_field(f, &ControlInput::Reference(Some(5)), &targets);
        assert_eq!(rendered.value, FieldValue::Integer(5));

        let unlisted = render_field(f, &ControlInput::Reference(Some(4)), &targets);
        assert_eq!(unlisted.value, FieldValue::Null);
    }

    #[test]
    fn test_boolean_nullable_has_three_states() {
        let f = field(&a008_sensor::ENTITY, "ativo");
        let pick = |label: &str| {
            render_field(f, &ControlInput::Choice(Some(label.to_string())), &[]).value
        };
        assert_eq!(pick("Yes"), FieldValue::Boolean(true));
        assert_eq!(pick("No"), FieldValue::Boolean(false));
        assert_eq!(pick("Undefined"), FieldValue::Null);

        let rendered = render_field(f, &seed_input(f, &FieldValue::Null), &[]);
        match rendered.control.widget {
            Widget::Select { options, selected, .. } => {
                assert_eq!(options.len(), 3);
                assert_eq!(selected.as_deref(), Some("Undefined"));
            }
            other => panic!("unexpected widget {:?}", other),
        }
    }

    #[test]
    fn test_enum_keeps_raw_choice() {
        let f = field(&a008_sensor::ENTITY, "tipo");
        let rendered = render_field(f, &ControlInput::Choice(Some("umidade".into())), &[]);
        assert_eq!(rendered.value, FieldValue::from("umidade"));
        let none = render_field(f, &ControlInput::Choice(None), &[]);
        assert_eq!(none.value, FieldValue::Null);
    }

    #[test]
    fn test_numbers() {
        let area = field(&a002_campo::ENTITY, "area_ha");
        let rendered = render_field(area, &ControlInput::Number(Some(12.5)), &[]);
        assert_eq!(rendered.value, FieldValue::Float(12.5));
        assert!(matches!(rendered.control.widget, Widget::Number { decimals: 2, .. }));

        let interval = field(&a008_sensor::ENTITY, "intervalo_leitura_s");
        let rendered = render_field(interval, &ControlInput::Integer(Some(30)), &[]);
        assert_eq!(rendered.value, FieldValue::Integer(30));
        let fractional = render_field(interval, &ControlInput::Number(Some(1.5)), &[]);
        assert_eq!(fractional.value, FieldValue::Float(1.5));
        let empty = render_field(interval, &ControlInput::Integer(None), &[]);
        assert_eq!(empty.value, FieldValue::Null);
    }

    #[test]
    fn test_whole_float_outside_i64_stays_float() {
        let interval = field(&a008_sensor::ENTITY, "intervalo_leitura_s");
        for huge in [1e20, -1e20, 9_223_372_036_854_775_808.0] {
            let rendered = render_field(interval, &ControlInput::Number(Some(huge)), &[]);
            assert_eq!(rendered.value, FieldValue::Float(huge));
            let message = crate::shared::edit_view::validation::check_field(interval, &rendered.value);
            assert!(message.unwrap().contains("Expected: integer"));
        }

        let lowest = render_field(interval, &ControlInput::Number(Some(i64::MIN as f64)), &[]);
        assert_eq!(lowest.value, FieldValue::Integer(i64::MIN));
    }

    #[test]
    fn test_text_is_bounded_and_empty_is_null() {
        let f = field(&a004_plantio::ENTITY, "nome");
        let rendered = render_field(f, &ControlInput::Text(String::new()), &[]);
        assert_eq!(rendered.value, FieldValue::Null);
        assert!(matches!(
            rendered.control.widget,
            Widget::Text { max_chars: Some(100), .. }
        ));
    }

    #[test]
    fn test_timestamp_needs_both_parts() {
        let f = field(&a004_plantio::ENTITY, "data_inicio");
        let date = NaiveDate::from_ymd_opt(2024, 9, 15);
        let time = NaiveTime::from_hms_opt(7, 0, 0);

        let both = render_field(f, &ControlInput::DateTime { date, time }, &[]);
        let expected = Utc.with_ymd_and_hms(2024, 9, 15, 7, 0, 0).unwrap();
        assert_eq!(both.value, FieldValue::Timestamp(expected));

        let date_only = render_field(f, &ControlInput::DateTime { date, time: None }, &[]);
        assert_eq!(date_only.value, FieldValue::Null);

        match both.control.widget {
            Widget::DateTime { date_label, time_label, .. } => {
                assert_eq!(date_label, "Data de Início - Date");
                assert_eq!(time_label, "Data de Início - Time");
            }
            other => panic!("unexpected widget {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_input_is_carried_raw() {
        let area = field(&a002_campo::ENTITY, "area_ha");
        let rendered = render_field(area, &ControlInput::Text("muito".into()), &[]);
        assert_eq!(rendered.value, FieldValue::from("muito"));
    }

    #[test]
    fn test_seed_round_trips_current_value() {
        let f = field(&a004_plantio::ENTITY, "data_inicio");
        let current = FieldValue::Timestamp(Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 0).unwrap());
        let rendered = render_field(f, &seed_input(f, &current), &[]);
        assert_eq!(rendered.value, current);
    }
}
