//! Answer validation against a survey's field schema.
//!
//! Validation is all-or-nothing from the caller's point of view: the full
//! answer document is checked and the caller rejects the submission when
//! any violation is reported. At most one violation is reported per field;
//! unknown answer keys are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{ColumnKind, FieldDefinition, FieldKind, TableSchema};
use crate::table::{normalize_table_answer, TableAnswer, TableStatus};

/// Which rule a violation was raised by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationRule {
    Required,
    Number,
    Table,
}

/// One validation failure, attributed to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    pub field_id: String,
    pub label: String,
    pub rule: ViolationRule,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &FieldDefinition, rule: ViolationRule, message: String) -> Self {
        Self {
            field_id: field.id.clone(),
            label: field.label.clone(),
            rule,
            message,
        }
    }
}

/// Validate an answer document against the survey's field list.
///
/// Returns the ordered violation list; empty means the document is
/// acceptable. Reports at most one violation per field.
pub fn validate_answers(
    fields: &[FieldDefinition],
    answers: &Map<String, Value>,
) -> Vec<FieldViolation> {
    fields
        .iter()
        .filter_map(|field| check_field(field, answers.get(&field.id)))
        .collect()
}

fn check_field(field: &FieldDefinition, value: Option<&Value>) -> Option<FieldViolation> {
    if field.kind == FieldKind::Table {
        return check_table_field(field, value);
    }

    let empty = value.map(is_empty_value).unwrap_or(true);
    if empty {
        if field.required {
            return Some(FieldViolation::new(
                field,
                ViolationRule::Required,
                format!("'{}' must be answered", field.label),
            ));
        }
        return None;
    }

    // Numbers must parse; invalid input is a violation, never a silent
    // blank-out.
    if field.kind == FieldKind::Number && !parses_as_number(value?) {
        return Some(FieldViolation::new(
            field,
            ViolationRule::Number,
            format!("'{}' must be a number", field.label),
        ));
    }

    None
}

fn check_table_field(field: &FieldDefinition, value: Option<&Value>) -> Option<FieldViolation> {
    let answer = value
        .map(normalize_table_answer)
        .unwrap_or_else(TableAnswer::empty);

    // An explicit "not applicable" satisfies a required table even with
    // zero rows.
    if answer.status == TableStatus::None {
        return None;
    }

    if answer.rows.is_empty() {
        if field.required {
            return Some(FieldViolation::new(
                field,
                ViolationRule::Required,
                format!("'{}' must have at least one row", field.label),
            ));
        }
        return None;
    }

    let schema = field.table.as_ref()?;
    check_table_rows(field, schema, &answer)
}

fn check_table_rows(
    field: &FieldDefinition,
    schema: &TableSchema,
    answer: &TableAnswer,
) -> Option<FieldViolation> {
    for (index, row) in answer.rows.iter().enumerate() {
        let row_number = index + 1;
        for column in &schema.columns {
            let cell = row.cells.get(&column.id);
            let empty = cell.map(is_empty_value).unwrap_or(true);

            if empty {
                if column.required {
                    return Some(FieldViolation::new(
                        field,
                        ViolationRule::Table,
                        format!(
                            "'{}' row {row_number} is missing a value for '{}'",
                            field.label, column.label
                        ),
                    ));
                }
                continue;
            }

            if column.kind == ColumnKind::Number && !parses_as_number(cell?) {
                return Some(FieldViolation::new(
                    field,
                    ViolationRule::Number,
                    format!(
                        "'{}' row {row_number} has a non-numeric value for '{}'",
                        field.label, column.label
                    ),
                ));
            }
        }
    }
    None
}

/// Whether a stored answer value counts as "not answered".
///
/// Missing keys, JSON null, blank strings and empty arrays are all empty;
/// numbers and booleans never are.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn parses_as_number(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => s.trim().parse::<f64>().is_ok(),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
