//! Table-answer model and read-side normalization.
//!
//! The grid editor emits an ordered row list; the stored value is a
//! `{status, rows, note?}` object where `NONE` is an explicit "not
//! applicable" assertion distinct from an empty grid. The stored shape has
//! evolved over time (bare row arrays, a transitional `UNKNOWN` status),
//! so every read edge runs [`normalize_table_answer`] and works on the
//! canonical shape only. Writes always persist the canonical shape;
//! normalization never mutates storage.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{FieldDefinition, FieldKind};

/// Valid table answer status strings on the wire.
pub const STATUS_INPUT: &str = "INPUT";
pub const STATUS_NONE: &str = "NONE";
pub const STATUS_UNKNOWN: &str = "UNKNOWN";

/// The respondent's assertion about a table-kind answer.
///
/// `Unknown` only appears in legacy stored data and is coerced to `None`
/// on read; it is never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Input,
    None,
    Unknown,
}

/// One row of a table-kind answer: cell values keyed by column id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub id: String,
    /// Older records stored the cell map under `data`.
    #[serde(default, alias = "data")]
    pub cells: Map<String, Value>,
}

/// The canonical in-memory value of a table-kind answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableAnswer {
    pub status: TableStatus,
    pub rows: Vec<TableRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TableAnswer {
    /// An empty grid awaiting input.
    pub fn empty() -> Self {
        Self {
            status: TableStatus::Input,
            rows: Vec::new(),
            note: None,
        }
    }

    /// Whether this answer carries actual row data.
    ///
    /// `NONE` answers count as zero rows for aggregation and export, no
    /// matter what was left in storage.
    pub fn is_populated(&self) -> bool {
        self.status == TableStatus::Input && !self.rows.is_empty()
    }
}

/// Normalize an arbitrary stored value into the canonical table answer.
///
/// Repair rules, applied on read only:
/// - a bare row array (pre-status records) becomes `INPUT` with those rows;
/// - `UNKNOWN`, a missing status, or an unrecognized status becomes `NONE`
///   with no rows;
/// - rows stored alongside a `NONE` status are dropped — "not applicable"
///   always reads as zero rows;
/// - anything else (scalars, null) becomes an empty `INPUT` grid.
pub fn normalize_table_answer(value: &Value) -> TableAnswer {
    match value {
        Value::Array(_) => TableAnswer {
            status: TableStatus::Input,
            rows: rows_from_value(value),
            note: None,
        },
        Value::Object(object) => {
            let note = object
                .get("note")
                .and_then(Value::as_str)
                .map(str::to_string);
            match object.get("status").and_then(Value::as_str) {
                Some(STATUS_INPUT) => TableAnswer {
                    status: TableStatus::Input,
                    rows: object.get("rows").map(rows_from_value).unwrap_or_default(),
                    note,
                },
                // NONE keeps its note but never its leftover rows; UNKNOWN
                // and malformed statuses are repaired to NONE.
                _ => TableAnswer {
                    status: TableStatus::None,
                    rows: Vec::new(),
                    note,
                },
            }
        }
        _ => TableAnswer::empty(),
    }
}

fn rows_from_value(value: &Value) -> Vec<TableRow> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Rewrite every table-kind answer in `answers` into the canonical shape.
///
/// Applied to answer documents at read edges and before writes; values for
/// non-table fields and unknown keys are left untouched.
pub fn normalize_table_answers(fields: &[FieldDefinition], answers: &mut Map<String, Value>) {
    for field in fields {
        if field.kind != FieldKind::Table {
            continue;
        }
        if let Some(value) = answers.get(&field.id) {
            let normalized = normalize_table_answer(value);
            // Serializing the canonical struct cannot fail.
            if let Ok(canonical) = serde_json::to_value(&normalized) {
                answers.insert(field.id.clone(), canonical);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table_field(id: &str) -> FieldDefinition {
        serde_json::from_value(json!({
            "id": id,
            "label": "Grid",
            "kind": "table",
            "tableSchema": {
                "columns": [{"id": "c1", "label": "A", "kind": "text"}]
            }
        }))
        .unwrap()
    }

    // -- normalize_table_answer -----------------------------------------------

    #[test]
    fn bare_array_becomes_input_with_rows() {
        let value = json!([
            {"id": "r1", "cells": {"c1": "a"}},
            {"id": "r2", "cells": {"c1": "b"}}
        ]);
        let answer = normalize_table_answer(&value);
        assert_eq!(answer.status, TableStatus::Input);
        assert_eq!(answer.rows.len(), 2);
        assert_eq!(answer.rows[0].cells.get("c1"), Some(&json!("a")));
    }

    #[test]
    fn legacy_data_key_is_accepted_for_cells() {
        let value = json!([{"id": "r1", "data": {"c1": "a"}}]);
        let answer = normalize_table_answer(&value);
        assert_eq!(answer.rows[0].cells.get("c1"), Some(&json!("a")));
    }

    #[test]
    fn input_object_keeps_rows_and_note() {
        let value = json!({
            "status": "INPUT",
            "rows": [{"id": "r1", "cells": {"c1": "a"}}],
            "note": "partial"
        });
        let answer = normalize_table_answer(&value);
        assert_eq!(answer.status, TableStatus::Input);
        assert_eq!(answer.rows.len(), 1);
        assert_eq!(answer.note.as_deref(), Some("partial"));
    }

    #[test]
    fn none_drops_leftover_rows() {
        let value = json!({
            "status": "NONE",
            "rows": [
                {"id": "r1", "cells": {"c1": "a"}},
                {"id": "r2", "cells": {"c1": "b"}},
                {"id": "r3", "cells": {"c1": "c"}}
            ],
            "note": "not applicable"
        });
        let answer = normalize_table_answer(&value);
        assert_eq!(answer.status, TableStatus::None);
        assert!(answer.rows.is_empty());
        assert_eq!(answer.note.as_deref(), Some("not applicable"));
        assert!(!answer.is_populated());
    }

    #[test]
    fn unknown_status_coerced_to_none() {
        let value = json!({"status": "UNKNOWN", "rows": [{"id": "r1", "cells": {}}]});
        let answer = normalize_table_answer(&value);
        assert_eq!(answer.status, TableStatus::None);
        assert!(answer.rows.is_empty());
    }

    #[test]
    fn missing_status_coerced_to_none() {
        let value = json!({"rows": [{"id": "r1", "cells": {}}]});
        let answer = normalize_table_answer(&value);
        assert_eq!(answer.status, TableStatus::None);
        assert!(answer.rows.is_empty());
    }

    #[test]
    fn scalar_becomes_empty_input() {
        for value in [json!("oops"), json!(42), Value::Null] {
            let answer = normalize_table_answer(&value);
            assert_eq!(answer.status, TableStatus::Input);
            assert!(answer.rows.is_empty());
        }
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let value = json!([{"id": "r1", "cells": {"c1": "a"}}, "garbage", 3]);
        let answer = normalize_table_answer(&value);
        assert_eq!(answer.rows.len(), 1);
    }

    // -- canonical write shape ------------------------------------------------

    #[test]
    fn canonical_shape_is_status_rows_note() {
        let answer = TableAnswer {
            status: TableStatus::Input,
            rows: vec![TableRow {
                id: "r1".to_string(),
                cells: Map::new(),
            }],
            note: None,
        };
        let value = serde_json::to_value(&answer).unwrap();
        assert_eq!(value["status"], "INPUT");
        assert!(value["rows"].is_array());
        assert!(value.get("note").is_none());
    }

    // -- normalize_table_answers ----------------------------------------------

    #[test]
    fn answers_normalized_in_place_for_table_fields_only() {
        let fields = vec![table_field("grid")];
        let mut answers = json!({
            "grid": [{"id": "r1", "cells": {"c1": "a"}}],
            "other": "untouched"
        })
        .as_object()
        .cloned()
        .unwrap();

        normalize_table_answers(&fields, &mut answers);

        assert_eq!(answers["grid"]["status"], "INPUT");
        assert_eq!(answers["grid"]["rows"].as_array().unwrap().len(), 1);
        assert_eq!(answers["other"], "untouched");
    }

    #[test]
    fn populated_requires_input_and_rows() {
        assert!(!TableAnswer::empty().is_populated());
        let answer = TableAnswer {
            status: TableStatus::Input,
            rows: vec![TableRow {
                id: "r1".to_string(),
                cells: Map::new(),
            }],
            note: None,
        };
        assert!(answer.is_populated());
    }
}
