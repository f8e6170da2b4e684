//! Axum route handlers for the Candidates API. Every status change refreshes
//! the job's pipeline counters.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use crate::candidates::queries::{
    delete_candidate, fetch_candidate, insert_interview, list_candidates, list_interviews,
    set_candidate_status, update_candidate,
};
use crate::email::{templates, SendOutcome};
use crate::errors::{AppError, JsonBody};
use crate::jobs::queries::{fetch_job, recalculate_job_counts};
use crate::models::candidate::{CandidateRow, CandidateStatus, CandidateUpdate};
use crate::models::interview::InterviewRow;
use crate::state::AppState;
use crate::storage;

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 100;
const LIST_SKILLS: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListCandidatesQuery {
    pub status: Option<String>,
    pub min_score: Option<f64>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl ListCandidatesQuery {
    fn page(&self) -> Result<(i64, i64), AppError> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if skip < 0 || !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(AppError::Validation(format!(
                "skip must be >= 0 and limit between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok((skip, limit))
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct InviteParams {
    /// RFC 3339 timestamp.
    pub interview_date: Option<String>,
    pub interview_link: Option<String>,
}

impl InviteParams {
    fn scheduled_at(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        self.interview_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(|d| {
                DateTime::parse_from_rfc3339(d.trim())
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| {
                        AppError::Validation(format!("interview_date must be RFC 3339: {e}"))
                    })
            })
            .transpose()
    }
}

/// Row shown in the per-job candidate table.
#[derive(Debug, Serialize)]
pub struct CandidateSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: String,
    pub match_score: Option<f64>,
    pub total_experience_years: f64,
    pub skills: Vec<String>,
    pub applied_at: DateTime<Utc>,
}

impl From<CandidateRow> for CandidateSummary {
    fn from(c: CandidateRow) -> Self {
        let skills = c.skill_names().into_iter().take(LIST_SKILLS).collect();
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            status: c.status,
            match_score: c.match_score,
            total_experience_years: c.total_experience_years,
            skills,
            applied_at: c.applied_at,
        }
    }
}

fn attachment_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| if c == '"' || c.is_control() { '_' } else { c })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

fn outcome_body(candidate: &CandidateRow, outcome: &SendOutcome, sent_message: &str) -> Value {
    match outcome {
        SendOutcome::Sent { email_id } => json!({
            "id": candidate.id,
            "email": candidate.email,
            "message": sent_message,
            "email_id": email_id,
        }),
        SendOutcome::Preview { to, subject } => json!({
            "id": candidate.id,
            "email": candidate.email,
            "message": "Email preview generated (Resend in test mode)",
            "test_mode": true,
            "preview": { "to": to, "subject": subject },
            "note": "To send real emails, verify a domain at resend.com/domains",
        }),
    }
}

async fn change_status(
    state: &AppState,
    candidate_id: Uuid,
    status: CandidateStatus,
) -> Result<CandidateRow, AppError> {
    let candidate = set_candidate_status(&state.db, candidate_id, status).await?;
    recalculate_job_counts(&state.db, candidate.job_id).await?;
    Ok(candidate)
}

fn status_body(candidate: &CandidateRow, message: String) -> Json<Value> {
    Json(json!({
        "id": candidate.id,
        "status": candidate.status,
        "message": message,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/candidates/job/:job_id
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<ListCandidatesQuery>,
) -> Result<Json<Vec<CandidateSummary>>, AppError> {
    let (skip, limit) = query.page()?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<CandidateStatus>)
        .transpose()?;
    fetch_job(&state.db, job_id).await?;

    let rows = list_candidates(&state.db, job_id, status, query.min_score, skip, limit).await?;
    Ok(Json(rows.into_iter().map(CandidateSummary::from).collect()))
}

/// GET /api/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<CandidateRow>, AppError> {
    Ok(Json(fetch_candidate(&state.db, candidate_id).await?))
}

/// PUT /api/candidates/:id
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    JsonBody(body): JsonBody<CandidateUpdate>,
) -> Result<Json<Value>, AppError> {
    body.validate()?;
    let candidate = update_candidate(&state.db, candidate_id, &body).await?;
    recalculate_job_counts(&state.db, candidate.job_id).await?;
    Ok(status_body(&candidate, "Candidate updated successfully".to_string()))
}

/// DELETE /api/candidates/:id
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let candidate = delete_candidate(&state.db, candidate_id).await?;

    if let Some(key) = &candidate.resume_key {
        if let Err(e) = storage::delete_resume(&state.s3, &state.config.s3_bucket, key).await {
            warn!("Orphaned resume {key} after deleting candidate {candidate_id}: {e}");
        }
    }
    recalculate_job_counts(&state.db, candidate.job_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/candidates/:id/status
pub async fn handle_update_candidate_status(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    JsonBody(body): JsonBody<StatusChange>,
) -> Result<Json<Value>, AppError> {
    let status: CandidateStatus = body.status.parse()?;
    let candidate = change_status(&state, candidate_id, status).await?;
    Ok(status_body(
        &candidate,
        format!("Candidate status updated to {status}"),
    ))
}

/// GET /api/candidates/:id/resume
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let candidate = fetch_candidate(&state.db, candidate_id).await?;
    let key = candidate
        .resume_key
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

    let data = storage::get_resume(&state.s3, &state.config.s3_bucket, &key).await?;
    let headers = [
        (header::CONTENT_TYPE, storage::content_type_for(&key).to_string()),
        (
            header::CONTENT_DISPOSITION,
            attachment_disposition(storage::download_name(&key)),
        ),
    ];
    Ok((headers, data))
}

/// POST /api/candidates/:id/shortlist
pub async fn handle_shortlist(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let candidate = change_status(&state, candidate_id, CandidateStatus::Shortlisted).await?;
    Ok(status_body(&candidate, "Candidate shortlisted".to_string()))
}

/// POST /api/candidates/:id/reject
pub async fn handle_reject(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let candidate = change_status(&state, candidate_id, CandidateStatus::Rejected).await?;
    Ok(status_body(&candidate, "Candidate rejected".to_string()))
}

/// POST /api/candidates/:id/send-assessment
pub async fn handle_send_assessment(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let candidate = fetch_candidate(&state.db, candidate_id).await?;
    let job = fetch_job(&state.db, candidate.job_id).await?;
    let match_score = candidate.match_score.ok_or_else(|| {
        AppError::Validation("Candidate has not been screened yet".to_string())
    })?;

    let email = templates::screening_result(
        &candidate.name,
        &job.title,
        match_score,
        candidate.status(),
        candidate.ai_assessment.as_deref(),
    );
    let outcome = state.mailer.send(&email, &candidate.email).await?;
    Ok(Json(outcome_body(
        &candidate,
        &outcome,
        "Assessment email sent successfully",
    )))
}

/// POST /api/candidates/:id/send-interview-invite?interview_date=&interview_link=
///
/// A test-mode preview still records the interview and moves the candidate on.
pub async fn handle_send_interview_invite(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Query(params): Query<InviteParams>,
) -> Result<Json<Value>, AppError> {
    let scheduled_at = params.scheduled_at()?;
    let link = params
        .interview_link
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    let candidate = fetch_candidate(&state.db, candidate_id).await?;
    let job = fetch_job(&state.db, candidate.job_id).await?;

    let when = scheduled_at.map(|dt| dt.format("%A, %B %-d, %Y at %H:%M UTC").to_string());
    let email = templates::interview_invite(&candidate.name, &job.title, when.as_deref(), link);
    let outcome = state.mailer.send(&email, &candidate.email).await?;

    let interview = insert_interview(&state.db, &candidate, scheduled_at, link, outcome.is_sent()).await?;
    let candidate = change_status(&state, candidate_id, CandidateStatus::InterviewScheduled).await?;

    let mut body = outcome_body(&candidate, &outcome, "Interview invitation sent successfully");
    body["status"] = json!(candidate.status);
    body["interview_id"] = json!(interview.id);
    Ok(Json(body))
}

/// GET /api/candidates/:id/interviews
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<Vec<InterviewRow>>, AppError> {
    fetch_candidate(&state.db, candidate_id).await?;
    Ok(Json(list_interviews(&state.db, candidate_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_page_defaults_and_bounds() {
        assert_eq!(ListCandidatesQuery::default().page().unwrap(), (0, 100));
        let bad = ListCandidatesQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert!(bad.page().is_err());
    }

    #[test]
    fn test_invite_date_parsing() {
        let params = InviteParams {
            interview_date: Some("2026-11-03T15:30:00+01:00".to_string()),
            interview_link: None,
        };
        let at = params.scheduled_at().unwrap().unwrap();
        assert_eq!(at.to_rfc3339(), "2026-11-03T14:30:00+00:00");

        assert_eq!(InviteParams::default().scheduled_at().unwrap(), None);

        let bad = InviteParams {
            interview_date: Some("next tuesday".to_string()),
            interview_link: None,
        };
        assert!(matches!(bad.scheduled_at(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_attachment_disposition_strips_quotes() {
        assert_eq!(
            attachment_disposition("a\"b.pdf"),
            "attachment; filename=\"a_b.pdf\""
        );
    }
}
