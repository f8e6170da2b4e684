//! Axum route handlers for the Jobs API.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use crate::errors::{AppError, JsonBody};
use crate::jobs::queries::{
    delete_job, fetch_job, insert_job, list_jobs, set_job_status, status_breakdown, update_job,
};
use crate::models::job::{JobCreate, JobRow, JobStatus, JobUpdate, SalaryView};
use crate::screening::job_analyzer::{
    analyze_job_description, suggest_optimizations, JobAnalysis, OptimizationReport,
};
use crate::state::AppState;
use crate::storage;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListJobsQuery {
    pub status: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl ListJobsQuery {
    fn page(&self) -> Result<(i64, i64), AppError> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if skip < 0 {
            return Err(AppError::Validation("skip must be >= 0".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok((skip, limit))
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: JobRow,
    pub application_link: String,
    pub salary: Option<SalaryView>,
}

impl From<JobRow> for JobView {
    fn from(job: JobRow) -> Self {
        Self {
            application_link: job.application_link(),
            salary: job.salary(),
            job,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobStatsResponse {
    pub job_id: Uuid,
    pub title: String,
    pub status: String,
    pub total_applicants: i32,
    pub screened_count: i32,
    pub shortlisted_count: i32,
    pub interviewed_count: i32,
    pub by_status: BTreeMap<String, i64>,
    pub days_open: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct JobAnalysisResponse {
    pub job_id: Uuid,
    pub analysis: JobAnalysis,
    pub optimization: OptimizationReport,
    pub well_optimized: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListJobsQuery>,
) -> Result<Json<Vec<JobView>>, AppError> {
    let (skip, limit) = query.page()?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<JobStatus>)
        .transpose()?;

    let jobs = list_jobs(&state.db, status, skip, limit).await?;
    Ok(Json(jobs.into_iter().map(JobView::from).collect()))
}

/// POST /api/jobs
///
/// New jobs start as drafts; publish them to accept applications.
pub async fn handle_create_job(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<JobCreate>,
) -> Result<(StatusCode, Json<JobView>), AppError> {
    body.validate()?;
    let job = insert_job(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(job.into())))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobView>, AppError> {
    Ok(Json(fetch_job(&state.db, job_id).await?.into()))
}

/// PUT /api/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    JsonBody(body): JsonBody<JobUpdate>,
) -> Result<Json<JobView>, AppError> {
    body.validate()?;
    Ok(Json(update_job(&state.db, job_id, &body).await?.into()))
}

/// DELETE /api/jobs/:id
///
/// Stored resumes are removed best-effort after the rows are gone.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let keys = delete_job(&state.db, job_id).await?;

    for key in &keys {
        if let Err(e) = storage::delete_resume(&state.s3, &state.config.s3_bucket, key).await {
            warn!("Orphaned resume {key} after deleting job {job_id}: {e}");
        }
    }

    Ok(Json(json!({
        "message": "Job deleted successfully",
        "id": job_id,
        "resumes_removed": keys.len(),
    })))
}

/// PATCH /api/jobs/:id/status
pub async fn handle_update_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    JsonBody(body): JsonBody<StatusChange>,
) -> Result<Json<JobView>, AppError> {
    let status: JobStatus = body.status.parse()?;
    Ok(Json(set_job_status(&state.db, job_id, status).await?.into()))
}

/// POST /api/jobs/:id/publish
pub async fn handle_publish_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let job = set_job_status(&state.db, job_id, JobStatus::Active).await?;
    Ok(Json(json!({
        "message": "Job published successfully",
        "id": job.id,
        "status": job.status,
        "published_at": job.published_at,
        "application_link": job.application_link(),
    })))
}

/// GET /api/jobs/:id/stats
pub async fn handle_job_stats(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobStatsResponse>, AppError> {
    let job = fetch_job(&state.db, job_id).await?;
    let by_status = status_breakdown(&state.db, job_id).await?.into_iter().collect();
    let days_open = job
        .published_at
        .map(|p| (job.closed_at.unwrap_or_else(Utc::now) - p).num_days());

    Ok(Json(JobStatsResponse {
        job_id,
        title: job.title,
        status: job.status,
        total_applicants: job.total_applicants,
        screened_count: job.screened_count,
        shortlisted_count: job.shortlisted_count,
        interviewed_count: job.interviewed_count,
        by_status,
        days_open,
    }))
}

/// GET /api/jobs/:id/analysis
///
/// Heuristic description review: detected signals plus improvement suggestions.
pub async fn handle_job_analysis(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobAnalysisResponse>, AppError> {
    let job = fetch_job(&state.db, job_id).await?;
    let text = job.public_description();

    let analysis = analyze_job_description(text).map_err(|e| AppError::Validation(e.to_string()))?;
    let optimization = suggest_optimizations(text);

    Ok(Json(JobAnalysisResponse {
        job_id,
        analysis,
        well_optimized: optimization.is_well_optimized(),
        optimization,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        assert_eq!(ListJobsQuery::default().page().unwrap(), (0, 20));
    }

    #[test]
    fn test_page_limit_bounds() {
        let too_big = ListJobsQuery {
            limit: Some(101),
            ..Default::default()
        };
        assert!(too_big.page().is_err());
        let negative_skip = ListJobsQuery {
            skip: Some(-1),
            ..Default::default()
        };
        assert!(negative_skip.page().is_err());
    }

    #[test]
    fn test_job_view_flattens_row() {
        let job = crate::models::job::test_job("Build things", vec![]);
        let id = job.id;
        let value = serde_json::to_value(JobView::from(job)).unwrap();
        assert_eq!(value["id"], json!(id));
        assert_eq!(value["application_link"], json!(format!("/apply/{id}")));
        assert!(value["salary"].is_null());
    }
}
