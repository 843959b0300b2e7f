//! Submission row model.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `survey_submissions` table. The answer document is kept
/// as raw JSONB; normalization and ownership stripping happen at the API
/// boundary, never in storage.
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionRow {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub org_id: String,
    pub org_name: String,
    pub answers: serde_json::Value,
    pub submitted_at: DateTime<Utc>,
}
