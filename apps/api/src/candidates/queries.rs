use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{CandidateRow, CandidateStatus, CandidateUpdate, Skill};
use crate::models::interview::InterviewRow;

fn not_found(candidate_id: Uuid) -> AppError {
    AppError::NotFound(format!("Candidate {candidate_id} not found"))
}

pub async fn fetch_candidate(pool: &PgPool, candidate_id: Uuid) -> Result<CandidateRow, AppError> {
    sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
        .bind(candidate_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(candidate_id))
}

/// Best match first; unscored candidates last, newest applications first within a tie.
pub async fn list_candidates(
    pool: &PgPool,
    job_id: Uuid,
    status: Option<CandidateStatus>,
    min_score: Option<f64>,
    skip: i64,
    limit: i64,
) -> Result<Vec<CandidateRow>, AppError> {
    let rows = sqlx::query_as::<_, CandidateRow>(
        r#"
        SELECT * FROM candidates
        WHERE job_id = $1
          AND ($2::TEXT IS NULL OR status = $2)
          AND ($3::DOUBLE PRECISION IS NULL OR match_score >= $3)
        ORDER BY match_score DESC NULLS LAST, applied_at DESC
        OFFSET $4 LIMIT $5
        "#,
    )
    .bind(job_id)
    .bind(status.map(|s| s.as_str()))
    .bind(min_score)
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_email(
    pool: &PgPool,
    job_id: Uuid,
    email: &str,
) -> Result<Option<CandidateRow>, AppError> {
    let row = sqlx::query_as::<_, CandidateRow>(
        "SELECT * FROM candidates WHERE job_id = $1 AND lower(email) = lower($2)",
    )
    .bind(job_id)
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Fields captured from the public application form.
#[derive(Debug, Clone, Default)]
pub struct NewCandidate {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub cover_letter: Option<String>,
    pub resume_key: String,
    pub resume_text: String,
}

/// Inserts an `applied` candidate. A second application with the same email
/// for the same job is a `Conflict`.
pub async fn insert_candidate(pool: &PgPool, new: &NewCandidate) -> Result<CandidateRow, AppError> {
    let result = sqlx::query_as::<_, CandidateRow>(
        r#"
        INSERT INTO candidates
            (id, job_id, name, email, phone, linkedin_url, github_url, portfolio_url,
             cover_letter, resume_key, resume_text, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(new.id)
    .bind(new.job_id)
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.phone)
    .bind(&new.linkedin_url)
    .bind(&new.github_url)
    .bind(&new.portfolio_url)
    .bind(&new.cover_letter)
    .bind(&new.resume_key)
    .bind(&new.resume_text)
    .bind(CandidateStatus::Applied.as_str())
    .fetch_one(pool)
    .await;

    match result {
        Ok(candidate) => {
            info!("Candidate {} applied to job {}", candidate.id, candidate.job_id);
            Ok(candidate)
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
            "You have already applied for this position".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Applies the present fields of `update`. Moving to `interview` stamps `interviewed_at`.
pub async fn update_candidate(
    pool: &PgPool,
    candidate_id: Uuid,
    update: &CandidateUpdate,
) -> Result<CandidateRow, AppError> {
    sqlx::query_as::<_, CandidateRow>(
        r#"
        UPDATE candidates SET
            status         = COALESCE($2, status),
            match_score    = COALESCE($3, match_score),
            ai_assessment  = COALESCE($4, ai_assessment),
            interviewed_at = CASE WHEN $2 = 'interview' THEN NOW() ELSE interviewed_at END,
            updated_at     = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(candidate_id)
    .bind(update.status.map(|s| s.as_str()))
    .bind(update.match_score)
    .bind(&update.ai_assessment)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(candidate_id))
}

pub async fn set_candidate_status(
    pool: &PgPool,
    candidate_id: Uuid,
    status: CandidateStatus,
) -> Result<CandidateRow, AppError> {
    let candidate = update_candidate(
        pool,
        candidate_id,
        &CandidateUpdate {
            status: Some(status),
            ..Default::default()
        },
    )
    .await?;
    info!("Candidate {candidate_id} is now {status}");
    Ok(candidate)
}

/// Returns the deleted row so callers can clean up its stored resume.
pub async fn delete_candidate(pool: &PgPool, candidate_id: Uuid) -> Result<CandidateRow, AppError> {
    sqlx::query_as::<_, CandidateRow>("DELETE FROM candidates WHERE id = $1 RETURNING *")
        .bind(candidate_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(candidate_id))
}

// ────────────────────────────────────────────────────────────────────────────
// Screening
// ────────────────────────────────────────────────────────────────────────────

/// `applied` candidates that have never been scored, oldest application first.
pub async fn unscreened_candidates(
    pool: &PgPool,
    job_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<CandidateRow>, AppError> {
    let rows = sqlx::query_as::<_, CandidateRow>(
        r#"
        SELECT * FROM candidates
        WHERE job_id = $1 AND status = 'applied' AND match_score IS NULL
        ORDER BY applied_at ASC
        LIMIT $2
        "#,
    )
    .bind(job_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn mark_screening(pool: &PgPool, candidate_ids: &[Uuid]) -> Result<u64, AppError> {
    let updated = sqlx::query(
        "UPDATE candidates SET status = 'screening', updated_at = NOW() WHERE id = ANY($1)",
    )
    .bind(candidate_ids)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(updated)
}

/// Everything a successful screening writes back to the candidate row.
#[derive(Debug, Clone)]
pub struct ScreeningResultUpdate<'a> {
    pub match_score: f64,
    pub status: CandidateStatus,
    pub skills: Vec<Skill>,
    pub resume_text: &'a str,
    pub total_experience_years: f64,
    pub ai_assessment: &'a str,
    pub match_details: Value,
}

pub async fn save_screening_result(
    pool: &PgPool,
    candidate_id: Uuid,
    result: ScreeningResultUpdate<'_>,
) -> Result<CandidateRow, AppError> {
    sqlx::query_as::<_, CandidateRow>(
        r#"
        UPDATE candidates SET
            match_score            = $2,
            status                 = $3,
            skills                 = $4,
            resume_text            = $5,
            total_experience_years = $6,
            ai_assessment          = $7,
            match_details          = $8,
            screened_at            = NOW(),
            updated_at             = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(candidate_id)
    .bind(result.match_score)
    .bind(result.status.as_str())
    .bind(Json(&result.skills))
    .bind(result.resume_text)
    .bind(result.total_experience_years)
    .bind(result.ai_assessment)
    .bind(Json(&result.match_details))
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(candidate_id))
}

/// JSON merged into `match_details` when screening fails. Score fields are
/// never part of it, so an earlier score survives a failed rescreen.
pub fn screening_failure_details(error: &str) -> Value {
    json!({ "last_error": error })
}

/// Keeps the error in `match_details.last_error` and, if the candidate is
/// still in `seen`, moves it to `seen.after_screening_failure()`. The score is
/// left untouched.
pub async fn record_screening_failure(
    pool: &PgPool,
    candidate_id: Uuid,
    seen: CandidateStatus,
    error: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE candidates SET
            status        = CASE WHEN status = $3 THEN $4 ELSE status END,
            match_details = COALESCE(match_details, '{}'::jsonb) || $2,
            updated_at    = NOW()
        WHERE id = $1
        "#,
    )
    .bind(candidate_id)
    .bind(Json(screening_failure_details(error)))
    .bind(seen.as_str())
    .bind(seen.after_screening_failure().as_str())
    .execute(pool)
    .await?;
    Ok(())
}

/// Scored candidates for one job, best first.
pub async fn screened_candidates(pool: &PgPool, job_id: Uuid) -> Result<Vec<CandidateRow>, AppError> {
    let rows = sqlx::query_as::<_, CandidateRow>(
        r#"
        SELECT * FROM candidates
        WHERE job_id = $1 AND match_score IS NOT NULL
        ORDER BY match_score DESC, applied_at DESC
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ────────────────────────────────────────────────────────────────────────────
// Interviews
// ────────────────────────────────────────────────────────────────────────────

/// Records an invitation. Without a date the interview is `pending`.
pub async fn insert_interview(
    pool: &PgPool,
    candidate: &CandidateRow,
    scheduled_at: Option<DateTime<Utc>>,
    meeting_link: Option<&str>,
    invite_sent: bool,
) -> Result<InterviewRow, AppError> {
    let status = if scheduled_at.is_some() { "scheduled" } else { "pending" };
    let interview = sqlx::query_as::<_, InterviewRow>(
        r#"
        INSERT INTO interviews
            (id, candidate_id, job_id, scheduled_at, meeting_link, status, invite_sent)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(candidate.id)
    .bind(candidate.job_id)
    .bind(scheduled_at)
    .bind(meeting_link)
    .bind(status)
    .bind(invite_sent)
    .fetch_one(pool)
    .await?;

    info!("Interview {} recorded for candidate {}", interview.id, candidate.id);
    Ok(interview)
}

pub async fn list_interviews(pool: &PgPool, candidate_id: Uuid) -> Result<Vec<InterviewRow>, AppError> {
    let rows = sqlx::query_as::<_, InterviewRow>(
        "SELECT * FROM interviews WHERE candidate_id = $1 ORDER BY scheduled_at DESC NULLS LAST, created_at DESC",
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_details_only_carry_the_error() {
        let details = screening_failure_details("LLM error: timeout");
        let object = details.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(details["last_error"], "LLM error: timeout");
    }
}
