//! Job description heuristics: requirement derivation, structural analysis
//! and optimization suggestions. All pure functions over the description text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::models::job::Requirement;
use crate::screening::vocabulary::{
    contains_term, find_terms, title_case, BENEFIT_KEYWORDS, CULTURE_KEYWORDS,
    EDUCATION_KEYWORDS, EXCLUSIVE_TERMS, FALLBACK_JOB_SKILLS, GROWTH_KEYWORDS, JOB_TECH_SKILLS,
    SOFT_SKILLS,
};

const MAX_DERIVED_REQUIREMENTS: usize = 10;
const MIN_DESCRIPTION_CHARS: usize = 50;
const BRIEF_WORD_COUNT: usize = 100;
const LONG_WORD_COUNT: usize = 1000;

static YEARS_REQUIRED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\+?\s*years?\s*(?:of\s*)?(?:professional\s*)?experience")
        .expect("valid years regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobAnalysisError {
    #[error("Job description is too short or empty")]
    TooShort,
}

/// Builds a requirement list from the description when the recruiter gave none.
/// Every derived skill is marked required.
pub fn derive_requirements(description: &str) -> Vec<Requirement> {
    find_terms(description, FALLBACK_JOB_SKILLS)
        .into_iter()
        .take(MAX_DERIVED_REQUIREMENTS)
        .map(|skill| Requirement::required(title_case(skill)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkArrangement {
    Remote,
    Hybrid,
    OnSite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedLevel {
    Senior,
    LeadPrincipal,
    JuniorEntry,
    MidAssumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthVerdict {
    TooBrief,
    Good,
    TooLong,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobAnalysis {
    pub tech_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub experience_years: Option<u32>,
    pub education_keywords: Vec<String>,
    pub work_arrangements: Vec<WorkArrangement>,
    pub level: DetectedLevel,
    pub word_count: usize,
    pub length: LengthVerdict,
}

pub fn analyze_job_description(text: &str) -> Result<JobAnalysis, JobAnalysisError> {
    if text.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(JobAnalysisError::TooShort);
    }
    let lower = text.to_lowercase();
    let owned = |terms: Vec<&str>| terms.into_iter().map(String::from).collect::<Vec<_>>();

    let experience_years = YEARS_REQUIRED_RE
        .captures(&lower)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());

    let mut work_arrangements = Vec::new();
    if contains_term(&lower, "remote") {
        work_arrangements.push(WorkArrangement::Remote);
    }
    if contains_term(&lower, "hybrid") {
        work_arrangements.push(WorkArrangement::Hybrid);
    }
    if contains_term(&lower, "on-site") || contains_term(&lower, "onsite") {
        work_arrangements.push(WorkArrangement::OnSite);
    }

    let level = if contains_term(&lower, "senior") || contains_term(&lower, "sr.") {
        DetectedLevel::Senior
    } else if contains_term(&lower, "lead") || contains_term(&lower, "principal") {
        DetectedLevel::LeadPrincipal
    } else if ["junior", "jr.", "entry"].iter().any(|t| contains_term(&lower, t)) {
        DetectedLevel::JuniorEntry
    } else {
        DetectedLevel::MidAssumed
    };

    let word_count = text.split_whitespace().count();
    let length = if word_count < BRIEF_WORD_COUNT {
        LengthVerdict::TooBrief
    } else if word_count > LONG_WORD_COUNT {
        LengthVerdict::TooLong
    } else {
        LengthVerdict::Good
    };

    Ok(JobAnalysis {
        tech_skills: owned(find_terms(&lower, JOB_TECH_SKILLS)),
        soft_skills: owned(find_terms(&lower, SOFT_SKILLS)),
        experience_years,
        education_keywords: owned(find_terms(&lower, EDUCATION_KEYWORDS)),
        work_arrangements,
        level,
        word_count,
        length,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ChecklistItem {
    pub name: &'static str,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationReport {
    pub suggestions: Vec<String>,
    pub checklist: Vec<ChecklistItem>,
}

impl OptimizationReport {
    pub fn is_well_optimized(&self) -> bool {
        self.suggestions.is_empty()
    }
}

pub fn suggest_optimizations(text: &str) -> OptimizationReport {
    let lower = text.to_lowercase();
    let mut suggestions = Vec::new();

    let exclusive = find_terms(&lower, EXCLUSIVE_TERMS);
    if !exclusive.is_empty() {
        suggestions.push(format!(
            "Remove potentially exclusive terms: {}",
            exclusive.join(", ")
        ));
    }

    let has_benefits = !find_terms(&lower, BENEFIT_KEYWORDS).is_empty();
    if !has_benefits {
        suggestions.push("Consider adding information about benefits and perks".to_string());
    }

    if !lower.contains("salary") && !text.contains('$') && !lower.contains("compensation") {
        suggestions.push("Consider adding salary range for transparency".to_string());
    }

    if find_terms(&lower, CULTURE_KEYWORDS).len() < 2 {
        suggestions.push("Add more details about company culture and team environment".to_string());
    }

    if find_terms(&lower, GROWTH_KEYWORDS).is_empty() {
        suggestions.push("Highlight growth and learning opportunities".to_string());
    }

    let has_responsibilities = lower.contains("responsibilities") || lower.contains("you will");
    if !has_responsibilities && !lower.contains("duties") {
        suggestions
            .push("Clearly outline job responsibilities and day-to-day duties".to_string());
    }

    let first_line_short = text.lines().next().map_or(true, |l| l.chars().count() < 100);
    let checklist = vec![
        ChecklistItem {
            name: "Clear job title",
            passed: lower.contains("title") || first_line_short,
        },
        ChecklistItem {
            name: "Responsibilities listed",
            passed: has_responsibilities,
        },
        ChecklistItem {
            name: "Requirements specified",
            passed: lower.contains("requirements") || lower.contains("qualifications"),
        },
        ChecklistItem {
            name: "Benefits mentioned",
            passed: has_benefits,
        },
        ChecklistItem {
            name: "Contact information",
            passed: lower.contains("apply") || lower.contains("contact"),
        },
    ];

    OptimizationReport {
        suggestions,
        checklist,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = "Senior Backend Engineer\n\
        We are a remote-first team building payment infrastructure in Rust and Python. \
        You will design services on AWS with Docker and Kubernetes, and mentor junior engineers. \
        Requirements: 5+ years of professional experience, a bachelor degree in computer science, \
        strong communication and collaboration. We offer equity, health insurance, a learning budget \
        and a salary of $150k. Our culture values ownership. Apply via the careers page.";

    #[test]
    fn test_derive_requirements_from_description() {
        let reqs = derive_requirements(JD);
        let skills: Vec<&str> = reqs.iter().map(|r| r.skill.as_str()).collect();
        assert_eq!(
            skills,
            vec!["Python", "Rust", "Aws", "Docker", "Kubernetes", "Communication"]
        );
        assert!(reqs.iter().all(|r| r.required));
    }

    #[test]
    fn test_derive_requirements_caps_at_ten() {
        let text = "python javascript java c++ go rust typescript react angular vue node django";
        assert_eq!(derive_requirements(text).len(), 10);
    }

    #[test]
    fn test_analyze_rejects_short_text() {
        assert_eq!(
            analyze_job_description("Rust dev").unwrap_err(),
            JobAnalysisError::TooShort
        );
        assert_eq!(
            JobAnalysisError::TooShort.to_string(),
            "Job description is too short or empty"
        );
    }

    #[test]
    fn test_analyze_detects_signals() {
        let a = analyze_job_description(JD).unwrap();
        assert!(a.tech_skills.contains(&"rust".to_string()));
        assert!(a.tech_skills.contains(&"kubernetes".to_string()));
        assert_eq!(a.soft_skills, vec!["communication", "collaboration"]);
        assert_eq!(a.experience_years, Some(5));
        assert!(a.education_keywords.contains(&"bachelor".to_string()));
        assert_eq!(a.work_arrangements, vec![WorkArrangement::Remote]);
        assert_eq!(a.level, DetectedLevel::Senior);
        assert_eq!(a.length, LengthVerdict::TooBrief);
    }

    #[test]
    fn test_analyze_assumes_mid_level() {
        let text = "We are hiring a backend developer to build APIs with Go and Postgres for our team.";
        assert_eq!(analyze_job_description(text).unwrap().level, DetectedLevel::MidAssumed);
    }

    #[test]
    fn test_suggestions_for_complete_description() {
        let report = suggest_optimizations(JD);
        assert!(report.is_well_optimized(), "{:?}", report.suggestions);
        assert!(report.checklist.iter().all(|c| c.passed));
    }

    #[test]
    fn test_suggestions_for_sparse_description() {
        let report = suggest_optimizations("Looking for a rockstar ninja developer.");
        assert_eq!(
            report.suggestions[0],
            "Remove potentially exclusive terms: rockstar, ninja"
        );
        assert_eq!(report.suggestions.len(), 6);
        let benefits = report
            .checklist
            .iter()
            .find(|c| c.name == "Benefits mentioned")
            .unwrap();
        assert!(!benefits.passed);
    }
}
