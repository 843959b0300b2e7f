//! Admin survey management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use canvass_core::error::CoreError;
use canvass_core::schema::{
    validate_survey_definition, FieldDefinition, SubmissionWindow,
};

use canvass_db::models::SaveSurvey;
use canvass_db::repositories::{SubmissionRepo, SurveyRepo};

use crate::dto::SurveySummary;
use crate::error::{AppError, AppResult};
use crate::middleware::AdminAccess;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSurveyBody {
    pub title: String,
    pub description: Option<String>,
    pub requesting_unit: Option<String>,
    #[serde(default, rename = "submissionWindow")]
    pub window: SubmissionWindow,
    #[serde(default)]
    pub manually_closed: bool,
    #[serde(default)]
    pub target_org_types: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl SaveSurveyBody {
    /// Definition-level validation, then conversion to the storage DTO.
    fn into_save(self) -> AppResult<SaveSurvey> {
        let errors = validate_survey_definition(&self.title, &self.window, &self.fields);
        if !errors.is_empty() {
            return Err(AppError::Core(CoreError::Validation(errors.join("; "))));
        }

        let fields = serde_json::to_value(&self.fields)
            .map_err(|e| AppError::InternalError(format!("failed to encode fields: {e}")))?;

        Ok(SaveSurvey {
            title: self.title,
            description: self.description,
            requesting_unit: self.requesting_unit,
            opens_at: self.window.opens_at,
            closes_at: self.window.closes_at,
            manually_closed: self.manually_closed,
            target_org_types: self.target_org_types,
            fields,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteSurveyQuery {
    #[serde(default)]
    pub force: bool,
}

/// POST /api/v1/admin/surveys
pub async fn create_survey(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Json(body): Json<SaveSurveyBody>,
) -> AppResult<impl IntoResponse> {
    let input = body.into_save()?;
    let row = SurveyRepo::create(&state.pool, &input).await?;

    tracing::info!(survey_id = %row.id, title = %row.title, "Survey created");

    let summary = SurveySummary::new(row.into_definition()?, Utc::now());
    Ok((StatusCode::CREATED, Json(DataResponse { data: summary })))
}

/// PUT /api/v1/admin/surveys/{id}
pub async fn update_survey(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SaveSurveyBody>,
) -> AppResult<impl IntoResponse> {
    let input = body.into_save()?;
    let row = SurveyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "survey",
            id: id.to_string(),
        }))?;

    tracing::info!(survey_id = %row.id, "Survey updated");

    let summary = SurveySummary::new(row.into_definition()?, Utc::now());
    Ok(Json(DataResponse { data: summary }))
}

/// DELETE /api/v1/admin/surveys/{id}
///
/// Refused while submissions exist unless `?force=true`, in which case the
/// submissions cascade away with the survey.
pub async fn delete_survey(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteSurveyQuery>,
) -> AppResult<impl IntoResponse> {
    let submission_count = SubmissionRepo::count_by_survey(&state.pool, id).await?;
    if submission_count > 0 && !query.force {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Survey has {submission_count} submissions; pass force=true to delete anyway"
        ))));
    }

    let deleted = SurveyRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "survey",
            id: id.to_string(),
        }));
    }

    tracing::info!(survey_id = %id, submission_count, "Survey deleted");

    Ok(StatusCode::NO_CONTENT)
}
