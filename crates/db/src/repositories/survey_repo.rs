//! Repository for the `surveys` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{SaveSurvey, SurveyRow};

const COLUMNS: &str = "\
    id, title, description, requesting_unit, opens_at, closes_at, \
    manually_closed, target_org_types, fields, created_at";

/// Provides CRUD operations for surveys.
pub struct SurveyRepo;

impl SurveyRepo {
    /// Create a new survey.
    pub async fn create(pool: &PgPool, input: &SaveSurvey) -> Result<SurveyRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO surveys \
                 (title, description, requesting_unit, opens_at, closes_at, \
                  manually_closed, target_org_types, fields) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SurveyRow>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.requesting_unit)
            .bind(input.opens_at)
            .bind(input.closes_at)
            .bind(input.manually_closed)
            .bind(&input.target_org_types)
            .bind(&input.fields)
            .fetch_one(pool)
            .await
    }

    /// List all surveys, soonest-opening first; surveys without an opening
    /// bound sort last, ties break on creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<SurveyRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM surveys \
             ORDER BY opens_at ASC NULLS LAST, created_at ASC"
        );
        sqlx::query_as::<_, SurveyRow>(&query).fetch_all(pool).await
    }

    /// Find a survey by ID.
    pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<SurveyRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM surveys WHERE id = $1");
        sqlx::query_as::<_, SurveyRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace every mutable column of a survey.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &SaveSurvey,
    ) -> Result<Option<SurveyRow>, sqlx::Error> {
        let query = format!(
            "UPDATE surveys SET \
                 title = $2, \
                 description = $3, \
                 requesting_unit = $4, \
                 opens_at = $5, \
                 closes_at = $6, \
                 manually_closed = $7, \
                 target_org_types = $8, \
                 fields = $9 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SurveyRow>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.requesting_unit)
            .bind(input.opens_at)
            .bind(input.closes_at)
            .bind(input.manually_closed)
            .bind(&input.target_org_types)
            .bind(&input.fields)
            .fetch_optional(pool)
            .await
    }

    /// Delete a survey by ID. Cascade deletes its submissions.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM surveys WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
