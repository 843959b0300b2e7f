//! Wire DTOs shared across handlers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use canvass_core::ownership::strip_owner_key;
use canvass_core::schema::{FieldDefinition, SurveyDefinition};
use canvass_core::table::normalize_table_answers;
use canvass_core::window::WindowState;
use canvass_db::models::SubmissionRow;

/// A survey definition plus its computed window state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySummary {
    #[serde(flatten)]
    pub definition: SurveyDefinition,
    pub window_state: WindowState,
}

impl SurveySummary {
    pub fn new(definition: SurveyDefinition, now: DateTime<Utc>) -> Self {
        let window_state = definition.window_state(now);
        Self {
            definition,
            window_state,
        }
    }
}

/// A submission as returned to clients: table answers in canonical shape,
/// ownership token stripped.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDto {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub organization_id: String,
    pub organization_name: String,
    pub answers: serde_json::Value,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionDto {
    /// Build the client view of a stored row. Storage is never mutated;
    /// normalization and stripping happen on this copy only.
    pub fn from_row(row: SubmissionRow, fields: &[FieldDefinition]) -> Self {
        let mut answers = row.answers;
        if let Some(object) = answers.as_object_mut() {
            normalize_table_answers(fields, object);
        }
        strip_owner_key(&mut answers);
        Self {
            id: row.id,
            survey_id: row.survey_id,
            organization_id: row.org_id,
            organization_name: row.org_name,
            answers,
            submitted_at: row.submitted_at,
        }
    }
}
