//! Axum route handlers for the Screening API.
//!
//! Screening and LLM failures are answered with `200` and `"status": "failed"`
//! so the dashboard can show the message next to the candidate or job.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::candidates::queries::{
    fetch_candidate, mark_screening, record_screening_failure, screened_candidates,
    unscreened_candidates,
};
use crate::errors::AppError;
use crate::jobs::queries::{fetch_job, recalculate_job_counts};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::models::candidate::CandidateStatus;
use crate::models::job::Requirement;
use crate::screening::interview_kit::{generate_interview_package, InterviewType};
use crate::screening::job_analyzer::{derive_requirements, suggest_optimizations};
use crate::screening::pipeline::{effective_requirements, screen_candidate};
use crate::screening::prompts::{EXTRACT_REQUIREMENTS_PROMPT, JD_OPTIMIZE_PROMPT, JD_OPTIMIZE_SYSTEM};
use crate::screening::queue::{enqueue, ScreeningTask};
use crate::screening::screener::ScreeningMode;
use crate::screening::stats::{summarize_scores, ScoreSummary};
use crate::state::AppState;

const TOP_CANDIDATES: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ScreenQuery {
    pub limit: Option<i64>,
}

impl ScreenQuery {
    fn limit(&self) -> Result<Option<i64>, AppError> {
        match self.limit {
            Some(n) if n < 1 => Err(AppError::Validation("limit must be >= 1".to_string())),
            other => Ok(other),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct QuestionsQuery {
    pub interview_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TopCandidate {
    pub id: Uuid,
    pub name: String,
    pub score: Option<f64>,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ScreeningResultsResponse {
    pub job_id: Uuid,
    pub job_title: String,
    pub total_applicants: i32,
    #[serde(flatten)]
    pub summary: ScoreSummary,
    pub top_candidates: Vec<TopCandidate>,
}

fn failed(id_field: &str, id: Uuid, message: String) -> Json<Value> {
    Json(json!({
        id_field: id,
        "message": message,
        "status": "failed",
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/screening/job/:job_id/screen?limit=
///
/// Queues every unscored `applied` candidate that has a resume.
pub async fn handle_screen_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<ScreenQuery>,
) -> Result<Json<Value>, AppError> {
    let limit = query.limit()?;
    fetch_job(&state.db, job_id).await?;

    let candidates = unscreened_candidates(&state.db, job_id, limit).await?;
    let tasks: Vec<ScreeningTask> = candidates
        .iter()
        .filter(|c| c.resume_key.is_some() || c.resume_text.is_some())
        .map(|c| ScreeningTask {
            job_id,
            candidate_id: c.id,
        })
        .collect();

    if tasks.is_empty() {
        return Ok(Json(json!({
            "job_id": job_id,
            "message": "No unscreened candidates found",
            "screened_count": 0,
        })));
    }

    let ids: Vec<Uuid> = tasks.iter().map(|t| t.candidate_id).collect();
    mark_screening(&state.db, &ids).await?;

    if let Err(e) = enqueue(&state.redis, &tasks).await {
        for id in &ids {
            record_screening_failure(
                &state.db,
                *id,
                CandidateStatus::Screening,
                "Could not queue candidate for screening",
            )
            .await?;
        }
        return Err(e);
    }
    recalculate_job_counts(&state.db, job_id).await?;

    Ok(Json(json!({
        "job_id": job_id,
        "message": format!("Screening initiated for {} candidates", tasks.len()),
        "candidates_to_screen": tasks.len(),
        "status": "processing",
    })))
}

/// POST /api/screening/job/:job_id/optimize-jd
///
/// Returns a rewritten description for review; nothing is saved.
pub async fn handle_optimize_jd(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let job = fetch_job(&state.db, job_id).await?;
    let report = suggest_optimizations(&job.description);

    let suggestions = if report.suggestions.is_empty() {
        "- None; focus on clarity and structure".to_string()
    } else {
        report
            .suggestions
            .iter()
            .map(|s| format!("- {s}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let prompt = JD_OPTIMIZE_PROMPT
        .replace("{suggestions}", &suggestions)
        .replace("{job_description}", &job.description);

    match state.llm.call_text(&prompt, JD_OPTIMIZE_SYSTEM).await {
        Ok(optimized) => {
            info!("Optimized description for job {job_id}");
            Ok(Json(json!({
                "job_id": job_id,
                "message": "JD optimization completed",
                "optimized_description": optimized,
                "original_description": job.description,
                "suggestions": report.suggestions,
                "status": "completed",
            })))
        }
        Err(e) => {
            warn!("JD optimization failed for job {job_id}: {e}");
            Ok(failed("job_id", job_id, format!("JD optimization failed: {e}")))
        }
    }
}

/// POST /api/screening/job/:job_id/extract-requirements
///
/// Structured requirements read from the description. Falls back to the
/// vocabulary scan when the LLM answer is unusable.
pub async fn handle_extract_requirements(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let job = fetch_job(&state.db, job_id).await?;
    let prompt = EXTRACT_REQUIREMENTS_PROMPT.replace("{job_description}", job.public_description());

    let (requirements, source) = match state
        .llm
        .call_json::<Vec<Requirement>>(&prompt, JSON_ONLY_SYSTEM)
        .await
    {
        Ok(reqs) if !reqs.is_empty() => (reqs, "llm"),
        Ok(_) => (derive_requirements(job.public_description()), "heuristic"),
        Err(e) => {
            warn!("Requirement extraction failed for job {job_id}, using vocabulary scan: {e}");
            (derive_requirements(job.public_description()), "heuristic")
        }
    };

    Ok(Json(json!({
        "job_id": job_id,
        "requirements": requirements,
        "source": source,
        "status": "completed",
    })))
}

/// POST /api/screening/candidate/:id/generate-questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Query(query): Query<QuestionsQuery>,
) -> Result<Json<Value>, AppError> {
    let interview_type = query
        .interview_type
        .as_deref()
        .map(str::parse::<InterviewType>)
        .transpose()?
        .unwrap_or_default();

    let candidate = fetch_candidate(&state.db, candidate_id).await?;
    let job = fetch_job(&state.db, candidate.job_id).await?;
    let (requirements, _) = effective_requirements(&job);

    let package = generate_interview_package(
        &state.llm,
        job.public_description(),
        &requirements,
        &candidate.skill_names(),
        interview_type,
    )
    .await;

    Ok(Json(json!({
        "candidate_id": candidate_id,
        "candidate_name": candidate.name,
        "job_title": job.title,
        "interview_package": package,
        "status": "completed",
    })))
}

/// POST /api/screening/candidate/:id/rescreen
///
/// Synchronous quick screening of one candidate.
pub async fn handle_rescreen(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let candidate = fetch_candidate(&state.db, candidate_id).await?;
    let job = fetch_job(&state.db, candidate.job_id).await?;
    if candidate.resume_key.is_none() && candidate.resume_text.is_none() {
        return Err(AppError::Validation(
            "No resume found for candidate".to_string(),
        ));
    }

    match screen_candidate(&state, &candidate, &job, ScreeningMode::Quick).await {
        Ok(outcome) => Ok(Json(json!({
            "candidate_id": candidate_id,
            "match_score": outcome.match_score,
            "skills_extracted": outcome.skills.len(),
            "skills": outcome.skills,
            "status": outcome.status,
            "recommendation": outcome.recommendation,
            "backend": outcome.backend,
            "message": "Candidate re-screened successfully",
        }))),
        Err(e) => Ok(failed(
            "candidate_id",
            candidate_id,
            format!("Re-screening failed: {e}"),
        )),
    }
}

/// GET /api/screening/job/:job_id/results
pub async fn handle_screening_results(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ScreeningResultsResponse>, AppError> {
    let job = fetch_job(&state.db, job_id).await?;
    let screened = screened_candidates(&state.db, job_id).await?;

    let scores: Vec<f64> = screened.iter().filter_map(|c| c.match_score).collect();
    let summary = summarize_scores(&scores, state.config.min_match_score);

    let top_candidates = screened
        .into_iter()
        .take(TOP_CANDIDATES)
        .map(|c| TopCandidate {
            id: c.id,
            name: c.name,
            score: c.match_score,
            status: c.status,
        })
        .collect();

    Ok(Json(ScreeningResultsResponse {
        job_id,
        job_title: job.title,
        total_applicants: job.total_applicants,
        summary,
        top_candidates,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_limit_must_be_positive() {
        assert_eq!(ScreenQuery::default().limit().unwrap(), None);
        assert_eq!(ScreenQuery { limit: Some(5) }.limit().unwrap(), Some(5));
        assert!(ScreenQuery { limit: Some(0) }.limit().is_err());
    }

    #[test]
    fn test_failed_payload() {
        let Json(body) = failed("job_id", Uuid::nil(), "boom".to_string());
        assert_eq!(body["status"], "failed");
        assert_eq!(body["message"], "boom");
        assert_eq!(body["job_id"], Uuid::nil().to_string());
    }

    #[test]
    fn test_results_flatten_summary() {
        let response = ScreeningResultsResponse {
            job_id: Uuid::nil(),
            job_title: "Dev".to_string(),
            total_applicants: 3,
            summary: summarize_scores(&[88.0, 40.0], 60),
            top_candidates: vec![],
        };
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["average_score"], 64.0);
        assert_eq!(value["qualified_count"], 1);
        assert_eq!(value["score_distribution"]["80-89"], 1);
    }
}
