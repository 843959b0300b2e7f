//! Survey field/column schema model and definition-level validation.
//!
//! A survey is an ordered list of [`FieldDefinition`]s. Six field kinds are
//! supported; the `table` kind recursively carries its own column schema.
//! All types round-trip through serde with camelCase wire names, matching
//! what the form builder and submission clients exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Field and column kinds
// ---------------------------------------------------------------------------

/// The data type of a survey field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    LongText,
    Number,
    Date,
    SingleSelect,
    MultiSelect,
    Table,
}

impl FieldKind {
    /// Whether this kind carries an `options` list.
    pub fn has_options(&self) -> bool {
        matches!(self, Self::SingleSelect | Self::MultiSelect)
    }
}

/// The data type of a column inside a table-kind field.
///
/// Columns are scalar only: no nested tables, no multi-select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKind {
    Text,
    Number,
    Date,
    SingleSelect,
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// One column of a table-kind field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    pub id: String,
    pub label: String,
    pub kind: ColumnKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_width: Option<u32>,
}

fn default_min_rows() -> u32 {
    1
}

fn default_max_rows() -> u32 {
    100
}

/// The nested grid schema of a table-kind field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub columns: Vec<ColumnDefinition>,
    #[serde(default = "default_min_rows")]
    pub min_rows: u32,
    #[serde(default = "default_max_rows")]
    pub max_rows: u32,
    /// Human-readable description of when "not applicable" may be chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub na_condition: Option<String>,
}

/// One question in a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, rename = "tableSchema", skip_serializing_if = "Option::is_none")]
    pub table: Option<TableSchema>,
}

/// The absolute-timestamp submission window of a survey.
///
/// A missing bound means that side of the window is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionWindow {
    #[serde(default)]
    pub opens_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closes_at: Option<DateTime<Utc>>,
}

/// A named, versionless data-collection request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDefinition {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requesting_unit: String,
    #[serde(rename = "submissionWindow")]
    pub window: SubmissionWindow,
    #[serde(default)]
    pub manually_closed: bool,
    /// Eligible organization types; empty means every type is targeted.
    #[serde(default)]
    pub target_org_types: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Definition-level validation
// ---------------------------------------------------------------------------

/// Validate a survey definition as submitted by the administrator.
///
/// Returns a list of human-readable violations; empty means valid.
pub fn validate_survey_definition(
    title: &str,
    window: &SubmissionWindow,
    fields: &[FieldDefinition],
) -> Vec<String> {
    let mut violations = Vec::new();

    if title.trim().is_empty() {
        violations.push("title must not be empty".to_string());
    }

    if let (Some(opens), Some(closes)) = (window.opens_at, window.closes_at) {
        if opens > closes {
            violations.push("opensAt must not be after closesAt".to_string());
        }
    }

    violations.extend(validate_fields(fields));
    violations
}

/// Validate a field list on its own (also used for reusable templates).
pub fn validate_fields(fields: &[FieldDefinition]) -> Vec<String> {
    let mut violations = Vec::new();
    let mut seen_ids: Vec<&str> = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let position = index + 1;

        if field.id.trim().is_empty() {
            violations.push(format!("field {position} has an empty id"));
        } else if seen_ids.contains(&field.id.as_str()) {
            violations.push(format!("field id '{}' is duplicated", field.id));
        } else {
            seen_ids.push(&field.id);
        }

        if field.label.trim().is_empty() {
            violations.push(format!("field {position} has an empty label"));
        }

        if field.kind.has_options() && field.options.iter().all(|o| o.trim().is_empty()) {
            violations.push(format!(
                "field '{}' must have at least one option",
                field.label
            ));
        }

        match (field.kind, &field.table) {
            (FieldKind::Table, Some(schema)) => {
                violations.extend(validate_table_schema(&field.label, schema));
            }
            (FieldKind::Table, None) => {
                violations.push(format!(
                    "table field '{}' must define a table schema",
                    field.label
                ));
            }
            // A stale tableSchema on a non-table field is ignored.
            _ => {}
        }
    }

    violations
}

fn validate_table_schema(field_label: &str, schema: &TableSchema) -> Vec<String> {
    let mut violations = Vec::new();

    if schema.columns.is_empty() {
        violations.push(format!(
            "table field '{field_label}' must have at least one column"
        ));
    }

    let mut seen_ids: Vec<&str> = Vec::new();
    for (index, column) in schema.columns.iter().enumerate() {
        let position = index + 1;

        if column.id.trim().is_empty() {
            violations.push(format!(
                "table field '{field_label}' column {position} has an empty id"
            ));
        } else if seen_ids.contains(&column.id.as_str()) {
            violations.push(format!(
                "table field '{field_label}' column id '{}' is duplicated",
                column.id
            ));
        } else {
            seen_ids.push(&column.id);
        }

        if column.kind == ColumnKind::SingleSelect
            && column.options.iter().all(|o| o.trim().is_empty())
        {
            violations.push(format!(
                "table field '{field_label}' column '{}' must have at least one option",
                column.label
            ));
        }
    }

    if schema.min_rows > schema.max_rows {
        violations.push(format!(
            "table field '{field_label}' minRows must not exceed maxRows"
        ));
    }

    violations
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_field(id: &str, label: &str) -> FieldDefinition {
        FieldDefinition {
            id: id.to_string(),
            label: label.to_string(),
            kind: FieldKind::Text,
            required: false,
            description: None,
            options: Vec::new(),
            table: None,
        }
    }

    fn table_field(id: &str, columns: Vec<ColumnDefinition>) -> FieldDefinition {
        FieldDefinition {
            id: id.to_string(),
            label: format!("{id} label"),
            kind: FieldKind::Table,
            required: false,
            description: None,
            options: Vec::new(),
            table: Some(TableSchema {
                columns,
                min_rows: 1,
                max_rows: 100,
                na_condition: None,
            }),
        }
    }

    fn column(id: &str, kind: ColumnKind) -> ColumnDefinition {
        ColumnDefinition {
            id: id.to_string(),
            label: format!("{id} label"),
            kind,
            required: false,
            options: Vec::new(),
            display_width: None,
        }
    }

    // -- serde wire format ----------------------------------------------------

    #[test]
    fn field_kind_wire_strings() {
        for (kind, wire) in [
            (FieldKind::Text, "\"text\""),
            (FieldKind::LongText, "\"longText\""),
            (FieldKind::Number, "\"number\""),
            (FieldKind::Date, "\"date\""),
            (FieldKind::SingleSelect, "\"singleSelect\""),
            (FieldKind::MultiSelect, "\"multiSelect\""),
            (FieldKind::Table, "\"table\""),
        ] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), wire);
        }
    }

    #[test]
    fn field_definition_deserializes_from_wire_shape() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "id": "q1",
            "label": "Staff count",
            "kind": "table",
            "required": true,
            "tableSchema": {
                "columns": [
                    {"id": "c1", "label": "Name", "kind": "text", "required": true, "displayWidth": 120}
                ],
                "minRows": 1,
                "maxRows": 20,
                "naCondition": "No staff on site"
            }
        }))
        .unwrap();

        assert_eq!(field.kind, FieldKind::Table);
        let schema = field.table.unwrap();
        assert_eq!(schema.columns.len(), 1);
        assert_eq!(schema.columns[0].display_width, Some(120));
        assert_eq!(schema.max_rows, 20);
        assert_eq!(schema.na_condition.as_deref(), Some("No staff on site"));
    }

    #[test]
    fn table_schema_row_bounds_default() {
        let schema: TableSchema = serde_json::from_value(json!({
            "columns": [{"id": "c1", "label": "A", "kind": "text"}]
        }))
        .unwrap();
        assert_eq!(schema.min_rows, 1);
        assert_eq!(schema.max_rows, 100);
    }

    #[test]
    fn survey_definition_camel_case_round_trip() {
        let survey = SurveyDefinition {
            id: Uuid::nil(),
            title: "Quarterly count".to_string(),
            description: String::new(),
            requesting_unit: "Health division".to_string(),
            window: SubmissionWindow::default(),
            manually_closed: false,
            target_org_types: vec!["health-center".to_string()],
            fields: vec![text_field("q1", "Q1")],
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&survey).unwrap();
        assert!(value.get("requestingUnit").is_some());
        assert!(value.get("submissionWindow").is_some());
        assert!(value.get("targetOrgTypes").is_some());
        assert!(value.get("manuallyClosed").is_some());

        let back: SurveyDefinition = serde_json::from_value(value).unwrap();
        assert_eq!(back.title, survey.title);
        assert_eq!(back.target_org_types, survey.target_org_types);
    }

    // -- validate_survey_definition -------------------------------------------

    #[test]
    fn valid_definition_has_no_violations() {
        let violations = validate_survey_definition(
            "Quarterly count",
            &SubmissionWindow::default(),
            &[text_field("q1", "Q1")],
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn empty_title_rejected() {
        let violations = validate_survey_definition("  ", &SubmissionWindow::default(), &[]);
        assert_eq!(violations, vec!["title must not be empty"]);
    }

    #[test]
    fn inverted_window_rejected() {
        let window = SubmissionWindow {
            opens_at: Some("2024-02-01T00:00:00Z".parse().unwrap()),
            closes_at: Some("2024-01-01T00:00:00Z".parse().unwrap()),
        };
        let violations = validate_survey_definition("t", &window, &[]);
        assert_eq!(violations, vec!["opensAt must not be after closesAt"]);
    }

    #[test]
    fn duplicate_field_ids_rejected() {
        let fields = vec![text_field("q1", "A"), text_field("q1", "B")];
        let violations = validate_fields(&fields);
        assert_eq!(violations, vec!["field id 'q1' is duplicated"]);
    }

    #[test]
    fn select_without_options_rejected() {
        let mut field = text_field("q1", "Pick one");
        field.kind = FieldKind::SingleSelect;
        let violations = validate_fields(&[field]);
        assert_eq!(
            violations,
            vec!["field 'Pick one' must have at least one option"]
        );
    }

    #[test]
    fn table_without_columns_rejected() {
        let field = table_field("q1", Vec::new());
        let violations = validate_fields(&[field]);
        assert_eq!(
            violations,
            vec!["table field 'q1 label' must have at least one column"]
        );
    }

    #[test]
    fn table_without_schema_rejected() {
        let mut field = text_field("q1", "Grid");
        field.kind = FieldKind::Table;
        let violations = validate_fields(&[field]);
        assert_eq!(
            violations,
            vec!["table field 'Grid' must define a table schema"]
        );
    }

    #[test]
    fn select_column_without_options_rejected() {
        let field = table_field("q1", vec![column("c1", ColumnKind::SingleSelect)]);
        let violations = validate_fields(&[field]);
        assert_eq!(
            violations,
            vec!["table field 'q1 label' column 'c1 label' must have at least one option"]
        );
    }

    #[test]
    fn duplicate_column_ids_rejected() {
        let field = table_field(
            "q1",
            vec![column("c1", ColumnKind::Text), column("c1", ColumnKind::Text)],
        );
        let violations = validate_fields(&[field]);
        assert_eq!(
            violations,
            vec!["table field 'q1 label' column id 'c1' is duplicated"]
        );
    }

    #[test]
    fn inverted_row_bounds_rejected() {
        let mut field = table_field("q1", vec![column("c1", ColumnKind::Text)]);
        field.table.as_mut().unwrap().min_rows = 10;
        field.table.as_mut().unwrap().max_rows = 2;
        let violations = validate_fields(&[field]);
        assert_eq!(
            violations,
            vec!["table field 'q1 label' minRows must not exceed maxRows"]
        );
    }
}
