//! HTTP handlers, grouped by surface.

pub mod admin_submissions;
pub mod admin_surveys;
pub mod coverage;
pub mod organizations;
pub mod submissions;
pub mod surveys;
pub mod templates;

use uuid::Uuid;

use canvass_core::error::CoreError;
use canvass_core::schema::SurveyDefinition;
use canvass_db::repositories::SurveyRepo;

use crate::error::{AppError, AppResult};

/// Load a survey definition or fail with 404.
pub(crate) async fn load_survey(
    pool: &canvass_db::DbPool,
    id: Uuid,
) -> AppResult<SurveyDefinition> {
    let row = SurveyRepo::find(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "survey",
            id: id.to_string(),
        }))?;
    Ok(row.into_definition()?)
}
