//! Survey row model and save DTO.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use canvass_core::error::CoreError;
use canvass_core::schema::{FieldDefinition, SubmissionWindow, SurveyDefinition};

/// A row from the `surveys` table. The field list is stored as a JSONB
/// document and decoded into typed definitions on the way out.
#[derive(Debug, Clone, FromRow)]
pub struct SurveyRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub requesting_unit: Option<String>,
    pub opens_at: Option<DateTime<Utc>>,
    pub closes_at: Option<DateTime<Utc>>,
    pub manually_closed: bool,
    pub target_org_types: Option<Vec<String>>,
    pub fields: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl SurveyRow {
    /// Decode the row into the domain definition.
    ///
    /// A fields document that no longer deserializes means the stored data
    /// was corrupted outside this service; surface it as an internal error
    /// rather than skipping fields silently.
    pub fn into_definition(self) -> Result<SurveyDefinition, CoreError> {
        let fields: Vec<FieldDefinition> = serde_json::from_value(self.fields)
            .map_err(|e| CoreError::Internal(format!("corrupt fields for survey {}: {e}", self.id)))?;
        Ok(SurveyDefinition {
            id: self.id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            requesting_unit: self.requesting_unit.unwrap_or_default(),
            window: SubmissionWindow {
                opens_at: self.opens_at,
                closes_at: self.closes_at,
            },
            manually_closed: self.manually_closed,
            target_org_types: self.target_org_types.unwrap_or_default(),
            fields,
            created_at: self.created_at,
        })
    }
}

/// Input for creating or updating a survey.
#[derive(Debug, Clone)]
pub struct SaveSurvey {
    pub title: String,
    pub description: Option<String>,
    pub requesting_unit: Option<String>,
    pub opens_at: Option<DateTime<Utc>>,
    pub closes_at: Option<DateTime<Utc>>,
    pub manually_closed: bool,
    pub target_org_types: Vec<String>,
    pub fields: serde_json::Value,
}
