//! Candidate Screener: pluggable backends that turn a resume and a job into a
//! 0–100 match score plus a hire recommendation.
//!
//! `AppState` holds an `Arc<dyn CandidateScreener>`, chosen at startup from
//! `SCREENING_BACKEND`. Both backends produce the same `ScreeningReport`.

use async_trait::async_trait;
use serde::Serialize;

use crate::config::ScoringWeights;
use crate::errors::AppError;
use crate::llm_client::prompts::{FAIRNESS_INSTRUCTION, SCORE_FORMAT_INSTRUCTION};
use crate::llm_client::LlmClient;
use crate::models::candidate::Recommendation;
use crate::models::job::{JobRow, Requirement};
use crate::screening::experience::{evaluate_experience, ExperienceReport};
use crate::screening::prompts::{FULL_SCREENING_PROMPT, QUICK_SCREENING_PROMPT, SCREENING_SYSTEM};
use crate::screening::resume_analyzer::{DegreeLevel, ResumeAnalysis};
use crate::screening::score_extract::{extract_recommendation, extract_score};
use crate::screening::skill_match::{match_skills, SkillMatchReport};
use crate::screening::vocabulary::{find_terms, SOFT_SKILLS};

const QUICK_RESUME_CHARS: usize = 4000;

// ────────────────────────────────────────────────────────────────────────────
// Inputs and outputs shared by every backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningMode {
    /// Resume analysis, skill report and experience report all go to the screener.
    Full,
    /// Raw resume excerpt plus the requirement list. Used for re-screening.
    Quick,
}

/// Everything a screener may look at for one candidate.
pub struct ScreeningInput<'a> {
    pub job: &'a JobRow,
    /// Effective requirements: the job's own, or ones derived from its description.
    pub requirements: &'a [Requirement],
    pub resume_text: &'a str,
    pub resume: &'a ResumeAnalysis,
    pub mode: ScreeningMode,
}

impl ScreeningInput<'_> {
    /// `None` when there is nothing to match against.
    pub fn skill_report(&self) -> Option<SkillMatchReport> {
        match_skills(self.requirements, &self.resume.skills, self.resume_text).ok()
    }

    pub fn experience_report(&self) -> ExperienceReport {
        evaluate_experience(
            self.resume.experience_years.map(f64::from),
            self.job.min_experience_years,
            self.job.level(),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    pub match_score: u32,
    pub recommendation: Recommendation,
    pub analysis: String,
    pub skill_report: Option<SkillMatchReport>,
    pub backend: &'static str,
}

#[async_trait]
pub trait CandidateScreener: Send + Sync {
    /// Short name persisted with each result ("keyword" | "llm").
    fn backend(&self) -> &'static str;

    async fn screen(&self, input: &ScreeningInput<'_>) -> Result<ScreeningReport, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordScreener
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic weighted composite, no network calls.
///
/// Components (each 0–100):
/// - skills: skill matcher overall score
/// - experience: experience matcher score
/// - education: detected degree against the job's stated requirement
/// - culture: share of the description's soft skills the resume mentions
///
/// When there are no requirements the skills component is left out and the
/// remaining weights are renormalized.
pub struct KeywordScreener {
    pub weights: ScoringWeights,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ComponentScores {
    skills: Option<f64>,
    experience: f64,
    education: f64,
    culture: f64,
}

impl KeywordScreener {
    fn composite(&self, c: &ComponentScores) -> u32 {
        let w = &self.weights;
        let mut weighted = c.experience * w.experience + c.education * w.education + c.culture * w.culture;
        let mut total = w.experience + w.education + w.culture;
        if let Some(skills) = c.skills {
            weighted += skills * w.skills;
            total += w.skills;
        }
        if total <= 0.0 {
            return 0;
        }
        (weighted / total).round().clamp(0.0, 100.0) as u32
    }
}

fn degree_rank(level: DegreeLevel) -> f64 {
    match level {
        DegreeLevel::Bachelor => 1.0,
        DegreeLevel::Master => 2.0,
        DegreeLevel::Doctorate => 3.0,
    }
}

fn education_score(required: Option<&str>, detected: Option<DegreeLevel>) -> f64 {
    let Some(required) = required.and_then(DegreeLevel::detect) else {
        return 100.0;
    };
    match detected {
        None => 0.0,
        Some(have) if have >= required => 100.0,
        Some(have) => degree_rank(have) / degree_rank(required) * 100.0,
    }
}

fn culture_score(description: &str, resume_soft_skills: &[String]) -> f64 {
    let wanted = find_terms(description, SOFT_SKILLS);
    if wanted.is_empty() {
        return 100.0;
    }
    let shown = wanted
        .iter()
        .filter(|term| resume_soft_skills.iter().any(|s| s == *term))
        .count();
    shown as f64 / wanted.len() as f64 * 100.0
}

#[async_trait]
impl CandidateScreener for KeywordScreener {
    fn backend(&self) -> &'static str {
        "keyword"
    }

    async fn screen(&self, input: &ScreeningInput<'_>) -> Result<ScreeningReport, AppError> {
        let skill_report = input.skill_report();
        let experience = input.experience_report();

        let components = ComponentScores {
            skills: skill_report.as_ref().map(|r| r.overall_score),
            experience: experience.score,
            education: education_score(
                input.job.education_required.as_deref(),
                input.resume.highest_degree,
            ),
            culture: culture_score(input.job.public_description(), &input.resume.soft_skills),
        };

        let match_score = self.composite(&components);
        let recommendation = Recommendation::from_score(match_score);

        let mut sections = vec![format!(
            "MATCH_SCORE: {match_score}\nRECOMMENDATION: {}",
            recommendation.as_str()
        )];
        match &skill_report {
            Some(report) => sections.push(report.render()),
            None => sections.push("SKILL MATCH ANALYSIS\nNo job requirements provided".to_string()),
        }
        sections.push(experience.render());
        sections.push(format!(
            "EDUCATION SCORE: {:.0}\nCULTURE SCORE: {:.0}",
            components.education, components.culture
        ));

        Ok(ScreeningReport {
            match_score,
            recommendation,
            analysis: sections.join("\n\n"),
            skill_report,
            backend: self.backend(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmScreener
// ────────────────────────────────────────────────────────────────────────────

/// Asks Claude for an assessment and parses score and recommendation out of
/// the free-text answer with the score-extraction fallbacks.
pub struct LlmScreener(pub LlmClient);

fn requirement_list(requirements: &[Requirement]) -> String {
    if requirements.is_empty() {
        return "Not specified".to_string();
    }
    requirements
        .iter()
        .map(|r| {
            if r.required {
                r.skill.clone()
            } else {
                format!("{} (nice to have)", r.skill)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn build_prompt(input: &ScreeningInput<'_>, skill_report: Option<&SkillMatchReport>) -> String {
    match input.mode {
        ScreeningMode::Full => {
            let skills = skill_report
                .map(SkillMatchReport::render)
                .unwrap_or_else(|| "SKILL MATCH ANALYSIS\nNo job requirements provided".to_string());
            FULL_SCREENING_PROMPT
                .replace("{fairness}", FAIRNESS_INSTRUCTION)
                .replace("{job_title}", &input.job.title)
                .replace("{job_description}", input.job.public_description())
                .replace("{min_years}", &input.job.min_experience_years.to_string())
                .replace("{level}", input.job.level().as_str())
                .replace("{resume_analysis}", &input.resume.render())
                .replace("{skill_report}", &skills)
                .replace("{experience_report}", &input.experience_report().render())
                .replace("{score_format}", SCORE_FORMAT_INSTRUCTION)
        }
        ScreeningMode::Quick => {
            let excerpt: String = input.resume_text.chars().take(QUICK_RESUME_CHARS).collect();
            QUICK_SCREENING_PROMPT
                .replace("{fairness}", FAIRNESS_INSTRUCTION)
                .replace("{resume_text}", &excerpt)
                .replace("{requirements}", &requirement_list(input.requirements))
                .replace("{min_years}", &input.job.min_experience_years.to_string())
                .replace("{score_format}", SCORE_FORMAT_INSTRUCTION)
        }
    }
}

#[async_trait]
impl CandidateScreener for LlmScreener {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn screen(&self, input: &ScreeningInput<'_>) -> Result<ScreeningReport, AppError> {
        let skill_report = input.skill_report();
        let prompt = build_prompt(input, skill_report.as_ref());

        let analysis = self
            .0
            .call_text(&prompt, SCREENING_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(e.to_string()))?;

        Ok(ScreeningReport {
            match_score: extract_score(&analysis),
            recommendation: extract_recommendation(&analysis),
            analysis,
            skill_report,
            backend: self.backend(),
        })
    }
}
