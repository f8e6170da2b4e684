//! Screening Pipeline: one candidate from stored resume to persisted score.
//!
//! Resume text → analysis → effective requirements → screener → candidate row
//! update → job counters. A failure at any step is recorded on the candidate
//! instead of leaving it stuck in `screening`.

use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::candidates::queries::{
    record_screening_failure, save_screening_result, ScreeningResultUpdate,
};
use crate::errors::AppError;
use crate::jobs::queries::{recalculate_job_counts, JobCounts};
use crate::models::candidate::{CandidateRow, CandidateStatus, Recommendation, Skill};
use crate::models::job::{JobRow, Requirement};
use crate::screening::extract::extract_text;
use crate::screening::job_analyzer::derive_requirements;
use crate::screening::resume_analyzer::{analyze_resume, ResumeAnalysis};
use crate::screening::screener::{ScreeningInput, ScreeningMode, ScreeningReport};
use crate::state::AppState;
use crate::storage;

const RESUME_ANALYSIS_EXCERPT_CHARS: usize = 1000;

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningOutcome {
    pub candidate_id: Uuid,
    pub match_score: u32,
    pub status: CandidateStatus,
    pub recommendation: Recommendation,
    pub backend: &'static str,
    pub skills: Vec<Skill>,
    pub counts: JobCounts,
}

/// The job's own requirements, or ones derived from its description.
/// The flag is true when they were derived.
pub fn effective_requirements(job: &JobRow) -> (Vec<Requirement>, bool) {
    if job.requirements.is_empty() {
        (derive_requirements(job.public_description()), true)
    } else {
        (job.requirements.to_vec(), false)
    }
}

async fn load_resume_text(state: &AppState, candidate: &CandidateRow) -> Result<String, AppError> {
    if let Some(text) = candidate.resume_text.as_deref().filter(|t| !t.trim().is_empty()) {
        return Ok(text.to_string());
    }
    let key = candidate
        .resume_key
        .as_deref()
        .ok_or_else(|| AppError::Validation("No resume found for candidate".to_string()))?;
    let data = storage::get_resume(&state.s3, &state.config.s3_bucket, key).await?;
    Ok(extract_text(key, data).await?)
}

fn match_details(
    report: &ScreeningReport,
    resume: &ResumeAnalysis,
    mode: ScreeningMode,
    requirements_derived: bool,
) -> serde_json::Value {
    let resume_analysis: String = resume
        .render()
        .chars()
        .take(RESUME_ANALYSIS_EXCERPT_CHARS)
        .collect();
    json!({
        "recommendation": report.recommendation,
        "backend": report.backend,
        "mode": mode,
        "skill_report": report.skill_report,
        "resume_analysis": resume_analysis,
        "requirements_derived": requirements_derived,
    })
}

async fn run_screening(
    state: &AppState,
    candidate: &CandidateRow,
    job: &JobRow,
    mode: ScreeningMode,
) -> Result<ScreeningOutcome, AppError> {
    let resume_text = load_resume_text(state, candidate).await?;
    let resume = analyze_resume(&resume_text);
    let (requirements, derived) = effective_requirements(job);

    let input = ScreeningInput {
        job,
        requirements: &requirements,
        resume_text: &resume_text,
        resume: &resume,
        mode,
    };
    let report = state.screener.screen(&input).await?;

    let status = CandidateStatus::from_screening(report.match_score, state.config.min_match_score);
    let skills: Vec<Skill> = resume.skills.iter().map(Skill::detected).collect();

    save_screening_result(
        &state.db,
        candidate.id,
        ScreeningResultUpdate {
            match_score: f64::from(report.match_score),
            status,
            skills: skills.clone(),
            resume_text: &resume_text,
            total_experience_years: resume.experience_years.map(f64::from).unwrap_or(0.0),
            ai_assessment: &report.analysis,
            match_details: match_details(&report, &resume, mode, derived),
        },
    )
    .await?;
    let counts = recalculate_job_counts(&state.db, job.id).await?;

    info!(
        "Screened candidate {} for job {}: score {} ({}) via {} -> {status}",
        candidate.id,
        job.id,
        report.match_score,
        report.recommendation.as_str(),
        report.backend
    );

    Ok(ScreeningOutcome {
        candidate_id: candidate.id,
        match_score: report.match_score,
        status,
        recommendation: report.recommendation,
        backend: report.backend,
        skills,
        counts,
    })
}

/// Screens one candidate against its job and persists the result.
///
/// On failure no score is written and the error is kept in
/// `match_details.last_error`. A candidate caught mid-screening returns to
/// `applied`; one further along keeps its status. The error is returned.
pub async fn screen_candidate(
    state: &AppState,
    candidate: &CandidateRow,
    job: &JobRow,
    mode: ScreeningMode,
) -> Result<ScreeningOutcome, AppError> {
    match run_screening(state, candidate, job, mode).await {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            error!("Screening failed for candidate {}: {e}", candidate.id);
            if let Err(record_err) =
                record_screening_failure(&state.db, candidate.id, candidate.status(), &e.to_string())
                    .await
            {
                error!("Could not record screening failure for {}: {record_err}", candidate.id);
            } else if let Err(count_err) = recalculate_job_counts(&state.db, job.id).await {
                error!("Could not refresh counters for job {}: {count_err}", job.id);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::test_job;

    #[test]
    fn test_effective_requirements_prefers_job_list() {
        let job = test_job("Python and Docker", vec![Requirement::required("Go")]);
        let (reqs, derived) = effective_requirements(&job);
        assert!(!derived);
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].skill, "Go");
    }

    #[test]
    fn test_effective_requirements_derives_from_description() {
        let job = test_job("We use Python, Docker and PostgreSQL every day.", vec![]);
        let (reqs, derived) = effective_requirements(&job);
        assert!(derived);
        assert!(reqs.iter().any(|r| r.skill == "Python"));
        assert!(reqs.iter().all(|r| r.required));
    }

    #[test]
    fn test_match_details_shape() {
        let resume = analyze_resume(&"Rust engineer. ".repeat(200));
        let report = ScreeningReport {
            match_score: 72,
            recommendation: Recommendation::Hire,
            analysis: "MATCH_SCORE: 72".to_string(),
            skill_report: None,
            backend: "keyword",
        };
        let details = match_details(&report, &resume, ScreeningMode::Quick, true);
        assert_eq!(details["recommendation"], "hire");
        assert_eq!(details["backend"], "keyword");
        assert_eq!(details["mode"], "quick");
        assert_eq!(details["requirements_derived"], true);
        assert!(details["skill_report"].is_null());
        let excerpt = details["resume_analysis"].as_str().unwrap();
        assert_eq!(excerpt.chars().count(), RESUME_ANALYSIS_EXCERPT_CHARS);
    }
}
