//! Coverage statistics: who has submitted, who has not.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use canvass_core::coverage::{compute_coverage, filter_organizations, OrganizationFilter};
use canvass_core::registry::org_code;

use canvass_db::repositories::SubmissionRepo;

use crate::error::AppResult;
use crate::handlers::load_survey;
use crate::middleware::AdminAccess;
use crate::response::DataResponse;
use crate::state::AppState;

/// The set of organization codes that submitted to a survey.
async fn submitted_codes(
    pool: &canvass_db::DbPool,
    survey_id: Uuid,
) -> Result<HashSet<String>, sqlx::Error> {
    let org_ids = SubmissionRepo::list_org_ids(pool, survey_id).await?;
    Ok(org_ids
        .iter()
        .map(|id| org_code(id).to_string())
        .collect())
}

/// GET /api/v1/admin/surveys/{id}/coverage
///
/// Overall counts plus per-region, per-type and region-by-type breakdowns
/// over the survey's targeted organization set.
pub async fn coverage_report(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(survey_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let definition = load_survey(&state.pool, survey_id).await?;
    let targets = state.registry.targeted(&definition.target_org_types);
    let submitted = submitted_codes(&state.pool, survey_id).await?;

    let report = compute_coverage(&targets, &submitted);

    Ok(Json(DataResponse { data: report }))
}

/// GET /api/v1/admin/surveys/{id}/coverage/organizations
///
/// The coverage drawer: each targeted organization with its submission
/// status, filterable by status, region, type and free-text search.
pub async fn coverage_organizations(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(survey_id): Path<Uuid>,
    Query(filter): Query<OrganizationFilter>,
) -> AppResult<impl IntoResponse> {
    let definition = load_survey(&state.pool, survey_id).await?;
    let targets = state.registry.targeted(&definition.target_org_types);
    let submitted = submitted_codes(&state.pool, survey_id).await?;

    let rows = filter_organizations(&targets, &submitted, &filter);

    Ok(Json(DataResponse { data: rows }))
}
