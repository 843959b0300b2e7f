//! Admin submission management: paged listing, edits, deletion.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use canvass_core::error::CoreError;
use canvass_core::ownership::{embed_owner_key, stored_owner_key};
use canvass_core::registry::org_code;
use canvass_core::table::normalize_table_answers;
use canvass_core::validation::validate_answers;

use canvass_db::repositories::SubmissionRepo;

use crate::dto::SubmissionDto;
use crate::error::{AppError, AppResult};
use crate::handlers::load_survey;
use crate::middleware::AdminAccess;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub region: Option<String>,
    pub org_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListResponse {
    pub rows: Vec<SubmissionDto>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateBody {
    #[serde(default)]
    pub answers: Map<String, Value>,
}

/// GET /api/v1/admin/surveys/{id}/submissions
///
/// Paged listing, newest first. `region`/`orgType` are resolved through
/// the registry into an organization-code allowlist; an unknown value
/// yields an empty page rather than an error.
pub async fn list_submissions(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(survey_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    let definition = load_survey(&state.pool, survey_id).await?;

    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * page_size;

    let org_codes: Option<Vec<String>> =
        if query.region.is_some() || query.org_type.is_some() {
            Some(
                state
                    .registry
                    .filter(query.region.as_deref(), query.org_type.as_deref())
                    .into_iter()
                    .map(|record| org_code(&record.id).to_string())
                    .collect(),
            )
        } else {
            None
        };

    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let result = SubmissionRepo::list_page(
        &state.pool,
        survey_id,
        search,
        org_codes.as_deref(),
        page_size,
        offset,
    )
    .await?;

    let rows = result
        .rows
        .into_iter()
        .map(|row| SubmissionDto::from_row(row, &definition.fields))
        .collect();

    Ok(Json(DataResponse {
        data: SubmissionListResponse {
            rows,
            total: result.total,
            page,
            page_size,
        },
    }))
}

/// PUT /api/v1/admin/surveys/{id}/submissions/{sid}
///
/// Replace a submission's answer document on the submitter's behalf. The
/// stored ownership token is preserved verbatim; a client-supplied value
/// for the reserved key is discarded.
pub async fn update_submission(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path((survey_id, submission_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<AdminUpdateBody>,
) -> AppResult<impl IntoResponse> {
    let definition = load_survey(&state.pool, survey_id).await?;

    let existing = SubmissionRepo::find(&state.pool, submission_id)
        .await?
        .filter(|row| row.survey_id == survey_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "submission",
            id: submission_id.to_string(),
        }))?;

    let violations = validate_answers(&definition.fields, &body.answers);
    if !violations.is_empty() {
        return Err(AppError::FieldValidation(violations));
    }

    let mut answers = body.answers;
    normalize_table_answers(&definition.fields, &mut answers);
    embed_owner_key(&mut answers, stored_owner_key(&existing.answers));

    let row = SubmissionRepo::update_answers(&state.pool, existing.id, &Value::Object(answers))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "submission",
            id: submission_id.to_string(),
        }))?;

    tracing::info!(
        submission_id = %row.id,
        survey_id = %survey_id,
        "Submission updated by admin",
    );

    Ok(Json(DataResponse {
        data: SubmissionDto::from_row(row, &definition.fields),
    }))
}

/// DELETE /api/v1/admin/submissions/{id}
pub async fn delete_submission(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let deleted = SubmissionRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "submission",
            id: id.to_string(),
        }));
    }

    tracing::info!(submission_id = %id, "Submission deleted by admin");

    Ok(StatusCode::NO_CONTENT)
}
