//! The submitter protocol: create-or-replace, lookup, update.
//!
//! There is no submitter account system. Ownership of a submission is
//! proven by presenting the same free-text key chosen at creation time;
//! the key is embedded in the stored answer document under a reserved key
//! and stripped from everything returned to clients.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use canvass_core::error::CoreError;
use canvass_core::ownership::{embed_owner_key, owner_key_matches};
use canvass_core::registry::org_code;
use canvass_core::schema::SurveyDefinition;
use canvass_core::table::normalize_table_answers;
use canvass_core::validation::validate_answers;
use canvass_core::window::{window_closed_error, WindowState};

use canvass_db::repositories::SubmissionRepo;

use crate::dto::SubmissionDto;
use crate::error::{AppError, AppResult};
use crate::handlers::load_survey;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    pub organization_id: String,
    pub organization_name: String,
    pub submitter_key: String,
    #[serde(default)]
    pub answers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupBody {
    pub organization_id: String,
    pub submitter_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
    pub organization_id: String,
    pub submitter_key: String,
    #[serde(default)]
    pub answers: Map<String, Value>,
}

/// Reject empty or whitespace-only submitter keys before anything else
/// touches storage.
fn require_submitter_key(key: &str) -> AppResult<()> {
    if key.trim().is_empty() {
        return Err(AppError::BadRequest(
            "submitterKey must not be empty".into(),
        ));
    }
    Ok(())
}

/// Authoritative window re-check for mutating calls.
fn require_open_window(definition: &SurveyDefinition) -> AppResult<()> {
    let state = definition.window_state(Utc::now());
    if state != WindowState::Open {
        return Err(AppError::Core(window_closed_error(
            state,
            &definition.window,
        )));
    }
    Ok(())
}

/// Validate, normalize and stamp an answer document for storage.
fn prepare_answers(
    definition: &SurveyDefinition,
    mut answers: Map<String, Value>,
    submitter_key: &str,
) -> AppResult<Value> {
    let violations = validate_answers(&definition.fields, &answers);
    if !violations.is_empty() {
        return Err(AppError::FieldValidation(violations));
    }

    normalize_table_answers(&definition.fields, &mut answers);
    embed_owner_key(&mut answers, submitter_key);
    Ok(Value::Object(answers))
}

/// POST /api/v1/surveys/{id}/submissions
///
/// Create a submission, atomically replacing any prior one from the same
/// organization. The server clock wins for `submittedAt`.
pub async fn create_or_replace(
    State(state): State<AppState>,
    Path(survey_id): Path<Uuid>,
    Json(body): Json<SubmitBody>,
) -> AppResult<impl IntoResponse> {
    require_submitter_key(&body.submitter_key)?;
    if body.organization_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "organizationId must not be empty".into(),
        ));
    }

    let definition = load_survey(&state.pool, survey_id).await?;
    require_open_window(&definition)?;

    let answers = prepare_answers(&definition, body.answers, &body.submitter_key)?;

    let row = SubmissionRepo::upsert(
        &state.pool,
        survey_id,
        &body.organization_id,
        &body.organization_name,
        &answers,
    )
    .await?;

    tracing::info!(
        submission_id = %row.id,
        survey_id = %survey_id,
        org_id = %body.organization_id,
        "Submission stored",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmissionDto::from_row(row, &definition.fields),
        }),
    ))
}

/// POST /api/v1/surveys/{id}/submissions/lookup
///
/// Retrieve the caller's own submission. A missing row and a wrong key are
/// indistinguishable: both read as 404.
pub async fn lookup_own(
    State(state): State<AppState>,
    Path(survey_id): Path<Uuid>,
    Json(body): Json<LookupBody>,
) -> AppResult<impl IntoResponse> {
    require_submitter_key(&body.submitter_key)?;

    let definition = load_survey(&state.pool, survey_id).await?;

    let row = SubmissionRepo::find_for_submitter(
        &state.pool,
        survey_id,
        org_code(&body.organization_id),
        &body.submitter_key,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "submission",
        id: body.organization_id.clone(),
    }))?;

    Ok(Json(DataResponse {
        data: SubmissionDto::from_row(row, &definition.fields),
    }))
}

/// PUT /api/v1/surveys/{id}/submissions/{submission_id}
///
/// Revise the caller's own submission. Check order is deliberate: locate
/// (404), then ownership (403), then window (409), then validation (400).
pub async fn update_own(
    State(state): State<AppState>,
    Path((survey_id, submission_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateBody>,
) -> AppResult<impl IntoResponse> {
    require_submitter_key(&body.submitter_key)?;

    let existing = SubmissionRepo::find(&state.pool, submission_id)
        .await?
        .filter(|row| row.survey_id == survey_id)
        .filter(|row| org_code(&row.org_id) == org_code(&body.organization_id))
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "submission",
            id: submission_id.to_string(),
        }))?;

    if !owner_key_matches(&existing.answers, &body.submitter_key) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Submitter key does not match this submission".into(),
        )));
    }

    let definition = load_survey(&state.pool, survey_id).await?;
    require_open_window(&definition)?;

    let answers = prepare_answers(&definition, body.answers, &body.submitter_key)?;

    let row = SubmissionRepo::update_answers(&state.pool, existing.id, &answers)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "submission",
            id: submission_id.to_string(),
        }))?;

    tracing::info!(
        submission_id = %row.id,
        survey_id = %survey_id,
        "Submission updated by submitter",
    );

    Ok(Json(DataResponse {
        data: SubmissionDto::from_row(row, &definition.fields),
    }))
}
