//! Reusable field-set templates for building new surveys.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use canvass_core::error::CoreError;
use canvass_core::schema::{validate_fields, FieldDefinition};

use canvass_db::models::SaveTemplate;
use canvass_db::repositories::TemplateRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::AdminAccess;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTemplateBody {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl SaveTemplateBody {
    /// Field lists in templates obey the same definition rules as surveys.
    fn into_save(self) -> AppResult<SaveTemplate> {
        if self.name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Template name must not be empty".into(),
            )));
        }
        let errors = validate_fields(&self.fields);
        if !errors.is_empty() {
            return Err(AppError::Core(CoreError::Validation(errors.join("; "))));
        }

        let fields = serde_json::to_value(&self.fields)
            .map_err(|e| AppError::InternalError(format!("failed to encode fields: {e}")))?;

        Ok(SaveTemplate {
            name: self.name,
            description: self.description,
            fields,
        })
    }
}

/// GET /api/v1/admin/templates
pub async fn list_templates(
    _admin: AdminAccess,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let templates = TemplateRepo::list(&state.pool).await?;

    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/admin/templates
pub async fn create_template(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Json(body): Json<SaveTemplateBody>,
) -> AppResult<impl IntoResponse> {
    let input = body.into_save()?;
    let template = TemplateRepo::create(&state.pool, &input).await?;

    tracing::info!(template_id = %template.id, name = %template.name, "Template created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/admin/templates/{id}
pub async fn get_template(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let template = TemplateRepo::find(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "template",
            id: id.to_string(),
        }))?;

    Ok(Json(DataResponse { data: template }))
}

/// PUT /api/v1/admin/templates/{id}
pub async fn update_template(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SaveTemplateBody>,
) -> AppResult<impl IntoResponse> {
    let input = body.into_save()?;
    let template = TemplateRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "template",
            id: id.to_string(),
        }))?;

    tracing::info!(template_id = %template.id, "Template updated");

    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/admin/templates/{id}
pub async fn delete_template(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let deleted = TemplateRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "template",
            id: id.to_string(),
        }));
    }

    tracing::info!(template_id = %id, "Template deleted");

    Ok(StatusCode::NO_CONTENT)
}
