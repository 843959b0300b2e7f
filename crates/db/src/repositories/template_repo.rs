//! Repository for the `survey_templates` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{SaveTemplate, TemplateRow};

const COLUMNS: &str = "id, name, description, fields, created_at, updated_at";

/// Provides CRUD operations for reusable survey templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Create a new template.
    pub async fn create(pool: &PgPool, input: &SaveTemplate) -> Result<TemplateRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO survey_templates (name, description, fields) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TemplateRow>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.fields)
            .fetch_one(pool)
            .await
    }

    /// List all templates, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<TemplateRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM survey_templates ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, TemplateRow>(&query).fetch_all(pool).await
    }

    /// Find a template by ID.
    pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<TemplateRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM survey_templates WHERE id = $1");
        sqlx::query_as::<_, TemplateRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a template's contents.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &SaveTemplate,
    ) -> Result<Option<TemplateRow>, sqlx::Error> {
        let query = format!(
            "UPDATE survey_templates SET \
                 name = $2, \
                 description = $3, \
                 fields = $4, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TemplateRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.fields)
            .fetch_optional(pool)
            .await
    }

    /// Delete a template by ID.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM survey_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
