//! Public survey read endpoints.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use canvass_db::repositories::SurveyRepo;

use crate::dto::SurveySummary;
use crate::error::AppResult;
use crate::handlers::load_survey;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/surveys
///
/// List all surveys with their computed window state.
pub async fn list_surveys(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let now = Utc::now();
    let rows = SurveyRepo::list(&state.pool).await?;

    let mut summaries = Vec::with_capacity(rows.len());
    for row in rows {
        summaries.push(SurveySummary::new(row.into_definition()?, now));
    }

    Ok(Json(DataResponse { data: summaries }))
}

/// GET /api/v1/surveys/{id}
///
/// Fetch one survey with its computed window state.
pub async fn get_survey(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let definition = load_survey(&state.pool, id).await?;
    let summary = SurveySummary::new(definition, Utc::now());

    Ok(Json(DataResponse { data: summary }))
}
