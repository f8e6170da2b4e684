use serde::Serialize;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{JobCreate, JobRow, JobStatus, JobUpdate};

pub async fn fetch_job(pool: &PgPool, job_id: Uuid) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

/// Newest first.
pub async fn list_jobs(
    pool: &PgPool,
    status: Option<JobStatus>,
    skip: i64,
    limit: i64,
) -> Result<Vec<JobRow>, AppError> {
    let rows = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT * FROM jobs
        WHERE ($1::TEXT IS NULL OR status = $1)
        ORDER BY created_at DESC
        OFFSET $2 LIMIT $3
        "#,
    )
    .bind(status.map(|s| s.as_str()))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Inserts a new job in `draft` status.
pub async fn insert_job(pool: &PgPool, body: &JobCreate) -> Result<JobRow, AppError> {
    let salary = body.salary.as_ref();
    let job = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs
            (id, title, department, location, remote_option, job_type, experience_level,
             description, responsibilities, benefits, requirements, min_experience_years,
             education_required, salary_min, salary_max, salary_currency, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(body.title.trim())
    .bind(&body.department)
    .bind(&body.location)
    .bind(body.remote_option)
    .bind(body.job_type.as_str())
    .bind(body.experience_level.as_str())
    .bind(&body.description)
    .bind(Json(&body.responsibilities))
    .bind(Json(&body.benefits))
    .bind(Json(&body.requirements))
    .bind(body.min_experience_years)
    .bind(&body.education_required)
    .bind(salary.and_then(|s| s.min_salary))
    .bind(salary.and_then(|s| s.max_salary))
    .bind(salary.map_or("USD", |s| s.currency.as_str()))
    .bind(JobStatus::Draft.as_str())
    .fetch_one(pool)
    .await?;

    info!("Created job {} ({})", job.id, job.title);
    Ok(job)
}

/// Applies the present fields of `update`.
/// Activating stamps `published_at` the first time; closing stamps `closed_at`.
pub async fn update_job(pool: &PgPool, job_id: Uuid, update: &JobUpdate) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs SET
            title                 = COALESCE($2, title),
            description           = COALESCE($3, description),
            optimized_description = COALESCE($4, optimized_description),
            requirements          = COALESCE($5, requirements),
            status                = COALESCE($6, status),
            published_at          = CASE WHEN $6 = 'active' AND published_at IS NULL
                                         THEN NOW() ELSE published_at END,
            closed_at             = CASE WHEN $6 = 'closed' THEN NOW() ELSE closed_at END,
            updated_at            = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(update.title.as_deref().map(str::trim))
    .bind(&update.description)
    .bind(&update.optimized_description)
    .bind(update.requirements.as_ref().map(Json))
    .bind(update.status.map(|s| s.as_str()))
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

pub async fn set_job_status(pool: &PgPool, job_id: Uuid, status: JobStatus) -> Result<JobRow, AppError> {
    let job = update_job(
        pool,
        job_id,
        &JobUpdate {
            status: Some(status),
            ..Default::default()
        },
    )
    .await?;
    info!("Job {job_id} is now {status}");
    Ok(job)
}

/// Deletes the job and, through cascades, its candidates and interviews.
/// Returns the resume keys that were attached to the deleted candidates.
pub async fn delete_job(pool: &PgPool, job_id: Uuid) -> Result<Vec<String>, AppError> {
    let mut tx = pool.begin().await?;

    let keys: Vec<String> = sqlx::query_scalar(
        "SELECT resume_key FROM candidates WHERE job_id = $1 AND resume_key IS NOT NULL",
    )
    .bind(job_id)
    .fetch_all(&mut *tx)
    .await?;

    let deleted = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }

    tx.commit().await?;
    info!("Deleted job {job_id} with {} stored resumes", keys.len());
    Ok(keys)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromRow)]
pub struct JobCounts {
    pub total_applicants: i32,
    pub screened_count: i32,
    pub shortlisted_count: i32,
    pub interviewed_count: i32,
}

/// Recomputes the denormalized pipeline counters from the candidates table.
pub async fn recalculate_job_counts(pool: &PgPool, job_id: Uuid) -> Result<JobCounts, AppError> {
    sqlx::query_as::<_, JobCounts>(
        r#"
        UPDATE jobs SET
            total_applicants  = (SELECT COUNT(*) FROM candidates WHERE job_id = $1),
            screened_count    = (SELECT COUNT(*) FROM candidates
                                 WHERE job_id = $1 AND match_score IS NOT NULL),
            shortlisted_count = (SELECT COUNT(*) FROM candidates
                                 WHERE job_id = $1 AND status = 'shortlisted'),
            interviewed_count = (SELECT COUNT(*) FROM candidates
                                 WHERE job_id = $1
                                   AND status IN ('interview', 'interview_scheduled', 'hired')),
            updated_at        = NOW()
        WHERE id = $1
        RETURNING total_applicants, screened_count, shortlisted_count, interviewed_count
        "#,
    )
    .bind(job_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

/// Candidate count per status for one job.
pub async fn status_breakdown(pool: &PgPool, job_id: Uuid) -> Result<Vec<(String, i64)>, AppError> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT status, COUNT(*) FROM candidates WHERE job_id = $1 GROUP BY status ORDER BY status",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
