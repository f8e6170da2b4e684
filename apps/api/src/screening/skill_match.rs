//! Skill Matcher: compares a job's requirement list against the skills found in a resume.
//!
//! A requirement counts as matched when a detected skill contains it (or is
//! contained in it), or when the requirement term itself appears in the resume
//! text on word boundaries. Required and optional requirements are scored
//! separately and blended 70/30.

use serde::Serialize;
use thiserror::Error;

use crate::models::job::Requirement;
use crate::screening::vocabulary::contains_term;

const REQUIRED_SHARE: f64 = 0.7;
const OPTIONAL_SHARE: f64 = 0.3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkillMatchError {
    #[error("No job requirements provided")]
    NoRequirements,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchVerdict {
    Strong,
    Good,
    Moderate,
    Low,
}

impl MatchVerdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            MatchVerdict::Strong
        } else if score >= 60.0 {
            MatchVerdict::Good
        } else if score >= 40.0 {
            MatchVerdict::Moderate
        } else {
            MatchVerdict::Low
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            MatchVerdict::Strong => "Strong candidate - recommend for interview",
            MatchVerdict::Good => "Good candidate with some skill gaps - consider for interview",
            MatchVerdict::Moderate => "Moderate match - may need significant training",
            MatchVerdict::Low => "Low match - consider other candidates",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillMatchReport {
    pub overall_score: f64,
    pub required_score: f64,
    pub optional_score: f64,
    pub matched_required: Vec<String>,
    pub missing_required: Vec<String>,
    pub matched_optional: Vec<String>,
    pub missing_optional: Vec<String>,
    pub verdict: MatchVerdict,
}

pub fn match_skills(
    requirements: &[Requirement],
    detected_skills: &[String],
    resume_text: &str,
) -> Result<SkillMatchReport, SkillMatchError> {
    if requirements.is_empty() {
        return Err(SkillMatchError::NoRequirements);
    }

    let detected: Vec<String> = detected_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    let resume_lower = resume_text.to_lowercase();

    let mut matched_required = Vec::new();
    let mut missing_required = Vec::new();
    let mut matched_optional = Vec::new();
    let mut missing_optional = Vec::new();

    for req in requirements {
        let skill = req.skill.trim().to_lowercase();
        if skill.is_empty() {
            continue;
        }
        let matched = detected
            .iter()
            .any(|d| d.contains(skill.as_str()) || skill.contains(d.as_str()))
            || contains_term(&resume_lower, &skill);

        let bucket = match (req.required, matched) {
            (true, true) => &mut matched_required,
            (true, false) => &mut missing_required,
            (false, true) => &mut matched_optional,
            (false, false) => &mut missing_optional,
        };
        bucket.push(skill);
    }

    let required_score = coverage(matched_required.len(), missing_required.len());
    let optional_score = coverage(matched_optional.len(), missing_optional.len());
    let overall_score = required_score * REQUIRED_SHARE + optional_score * OPTIONAL_SHARE;

    Ok(SkillMatchReport {
        overall_score,
        required_score,
        optional_score,
        matched_required,
        missing_required,
        matched_optional,
        missing_optional,
        verdict: MatchVerdict::from_score(overall_score),
    })
}

/// Percentage of matched items; an empty group counts as fully covered.
fn coverage(matched: usize, missing: usize) -> f64 {
    let total = matched + missing;
    if total == 0 {
        100.0
    } else {
        matched as f64 / total as f64 * 100.0
    }
}

impl SkillMatchReport {
    pub fn render(&self) -> String {
        let total_required = self.matched_required.len() + self.missing_required.len();
        let total_optional = self.matched_optional.len() + self.missing_optional.len();

        let mut out = vec![
            "SKILL MATCH ANALYSIS".to_string(),
            format!("OVERALL MATCH SCORE: {:.1}%", self.overall_score),
            format!("Required Skills Score: {:.1}%", self.required_score),
            format!("Optional Skills Score: {:.1}%", self.optional_score),
            format!(
                "\nMATCHED REQUIRED SKILLS ({}/{}):",
                self.matched_required.len(),
                total_required
            ),
        ];
        out.extend(self.matched_required.iter().map(|s| format!("  + {s}")));

        if !self.missing_required.is_empty() {
            out.push(format!(
                "\nMISSING REQUIRED SKILLS ({}):",
                self.missing_required.len()
            ));
            out.extend(self.missing_required.iter().map(|s| format!("  - {s}")));
        }
        if !self.matched_optional.is_empty() {
            out.push(format!(
                "\nMATCHED OPTIONAL SKILLS ({}/{}):",
                self.matched_optional.len(),
                total_optional
            ));
            out.extend(self.matched_optional.iter().map(|s| format!("  + {s}")));
        }
        if !self.missing_optional.is_empty() {
            out.push(format!(
                "\nMISSING OPTIONAL SKILLS ({}):",
                self.missing_optional.len()
            ));
            out.extend(self.missing_optional.iter().map(|s| format!("  o {s}")));
        }

        out.push(format!("\nRECOMMENDATION: {}", self.verdict.describe()));
        out.join("\n")
    }
}
