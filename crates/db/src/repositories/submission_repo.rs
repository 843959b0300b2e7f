//! Repository for the `survey_submissions` table.
//!
//! Organization identifiers are stored as submitted, in either their bare
//! or composite `type:code` form. Every lookup that matches on an
//! organization reduces the stored value to its trailing code segment with
//! `substring(org_id from '[^:]*$')` so both spellings join as one
//! organization.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use canvass_core::ownership::OWNER_KEY;

use crate::models::SubmissionRow;

const COLUMNS: &str = "id, survey_id, org_id, org_name, answers, submitted_at";

/// One page of submissions plus the total row count for the same filter.
#[derive(Debug)]
pub struct SubmissionPage {
    pub rows: Vec<SubmissionRow>,
    pub total: i64,
}

/// Provides persistence operations for survey submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert a submission, replacing any prior one from the same
    /// organization for the same survey.
    pub async fn upsert(
        pool: &PgPool,
        survey_id: Uuid,
        org_id: &str,
        org_name: &str,
        answers: &serde_json::Value,
    ) -> Result<SubmissionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO survey_submissions (survey_id, org_id, org_name, answers) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (survey_id, org_id) DO UPDATE SET \
                 org_name = EXCLUDED.org_name, \
                 answers = EXCLUDED.answers, \
                 submitted_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(survey_id)
            .bind(org_id)
            .bind(org_name)
            .bind(answers)
            .fetch_one(pool)
            .await
    }

    /// Find a submission by ID.
    pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<SubmissionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM survey_submissions WHERE id = $1");
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the submission a submitter owns for a survey: same organization
    /// code and a stored ownership token equal to the presented key.
    pub async fn find_for_submitter(
        pool: &PgPool,
        survey_id: Uuid,
        org_code: &str,
        submitter_key: &str,
    ) -> Result<Option<SubmissionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM survey_submissions \
             WHERE survey_id = $1 \
               AND substring(org_id from '[^:]*$') = $2 \
               AND answers->>'{OWNER_KEY}' = $3"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(survey_id)
            .bind(org_code)
            .bind(submitter_key)
            .fetch_optional(pool)
            .await
    }

    /// Find a survey's submission from a specific organization, regardless
    /// of who owns it.
    pub async fn find_by_org(
        pool: &PgPool,
        survey_id: Uuid,
        org_code: &str,
    ) -> Result<Option<SubmissionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM survey_submissions \
             WHERE survey_id = $1 \
               AND substring(org_id from '[^:]*$') = $2"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(survey_id)
            .bind(org_code)
            .fetch_optional(pool)
            .await
    }

    /// Replace a submission's answer document and bump its timestamp.
    pub async fn update_answers(
        pool: &PgPool,
        id: Uuid,
        answers: &serde_json::Value,
    ) -> Result<Option<SubmissionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE survey_submissions SET \
                 answers = $2, \
                 submitted_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(id)
            .bind(answers)
            .fetch_optional(pool)
            .await
    }

    /// List one page of a survey's submissions, newest first, with the
    /// total count for the same filter.
    ///
    /// `search` matches the organization name case-insensitively;
    /// `org_codes` restricts to an allowlist of organization codes (an
    /// empty allowlist matches nothing).
    pub async fn list_page(
        pool: &PgPool,
        survey_id: Uuid,
        search: Option<&str>,
        org_codes: Option<&[String]>,
        limit: i64,
        offset: i64,
    ) -> Result<SubmissionPage, sqlx::Error> {
        let mut count_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM survey_submissions");
        push_filters(&mut count_query, survey_id, search, org_codes);
        let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

        let mut list_query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM survey_submissions"));
        push_filters(&mut list_query, survey_id, search, org_codes);
        list_query.push(" ORDER BY submitted_at DESC LIMIT ");
        list_query.push_bind(limit);
        list_query.push(" OFFSET ");
        list_query.push_bind(offset);
        let rows = list_query
            .build_query_as::<SubmissionRow>()
            .fetch_all(pool)
            .await?;

        Ok(SubmissionPage { rows, total })
    }

    /// All organization identifiers that submitted to a survey, as stored.
    pub async fn list_org_ids(pool: &PgPool, survey_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT org_id FROM survey_submissions WHERE survey_id = $1")
            .bind(survey_id)
            .fetch_all(pool)
            .await
    }

    /// Number of submissions a survey has received.
    pub async fn count_by_survey(pool: &PgPool, survey_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM survey_submissions WHERE survey_id = $1")
            .bind(survey_id)
            .fetch_one(pool)
            .await
    }

    /// Delete a submission by ID.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM survey_submissions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn push_filters(
    query: &mut QueryBuilder<Postgres>,
    survey_id: Uuid,
    search: Option<&str>,
    org_codes: Option<&[String]>,
) {
    query.push(" WHERE survey_id = ");
    query.push_bind(survey_id);
    if let Some(search) = search {
        query.push(" AND org_name ILIKE ");
        query.push_bind(format!("%{search}%"));
    }
    if let Some(codes) = org_codes {
        query.push(" AND substring(org_id from '[^:]*$') = ANY(");
        query.push_bind(codes.to_vec());
        query.push(")");
    }
}
