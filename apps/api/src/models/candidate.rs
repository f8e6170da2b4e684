use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// Position of a candidate in the hiring pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    #[default]
    Applied,
    Screening,
    Shortlisted,
    Interview,
    InterviewScheduled,
    Offered,
    Hired,
    Rejected,
    Withdrawn,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Applied => "applied",
            CandidateStatus::Screening => "screening",
            CandidateStatus::Shortlisted => "shortlisted",
            CandidateStatus::Interview => "interview",
            CandidateStatus::InterviewScheduled => "interview_scheduled",
            CandidateStatus::Offered => "offered",
            CandidateStatus::Hired => "hired",
            CandidateStatus::Rejected => "rejected",
            CandidateStatus::Withdrawn => "withdrawn",
        }
    }

    /// Status kept after a failed screening. Only an in-flight screening falls
    /// back to `applied`; candidates further down the pipeline stay where they are.
    pub fn after_screening_failure(self) -> Self {
        match self {
            CandidateStatus::Screening => CandidateStatus::Applied,
            other => other,
        }
    }

    /// Status after screening: shortlisted at or above the threshold, rejected below.
    pub fn from_screening(score: u32, threshold: u32) -> Self {
        if score >= threshold {
            CandidateStatus::Shortlisted
        } else {
            CandidateStatus::Rejected
        }
    }

    /// Message shown to applicants checking on their application.
    pub fn applicant_message(&self) -> &'static str {
        match self {
            CandidateStatus::Applied => "Your application has been received and is being reviewed.",
            CandidateStatus::Screening => "Your application is currently being screened.",
            CandidateStatus::Shortlisted => {
                "Congratulations! You have been shortlisted for this position."
            }
            CandidateStatus::Interview | CandidateStatus::InterviewScheduled => {
                "You have been selected for an interview."
            }
            CandidateStatus::Offered => "An offer has been extended to you.",
            CandidateStatus::Hired => "Congratulations! You have been hired.",
            CandidateStatus::Rejected => {
                "Thank you for your interest. Unfortunately, we have decided to move forward with other candidates."
            }
            CandidateStatus::Withdrawn => "Your application has been withdrawn.",
        }
    }
}

impl FromStr for CandidateStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "applied" => Ok(CandidateStatus::Applied),
            "screening" => Ok(CandidateStatus::Screening),
            "shortlisted" => Ok(CandidateStatus::Shortlisted),
            "interview" => Ok(CandidateStatus::Interview),
            "interview_scheduled" => Ok(CandidateStatus::InterviewScheduled),
            "offered" => Ok(CandidateStatus::Offered),
            "hired" => Ok(CandidateStatus::Hired),
            "rejected" => Ok(CandidateStatus::Rejected),
            "withdrawn" => Ok(CandidateStatus::Withdrawn),
            other => Err(AppError::Validation(format!(
                "Unknown candidate status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hiring recommendation attached to a screening result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongHire,
    Hire,
    #[default]
    Review,
    NoHire,
    StrongNoHire,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongHire => "strong_hire",
            Recommendation::Hire => "hire",
            Recommendation::Review => "review",
            Recommendation::NoHire => "no_hire",
            Recommendation::StrongNoHire => "strong_no_hire",
        }
    }

    /// Score tiers used when no model wrote an explicit recommendation.
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Recommendation::StrongHire,
            60..=79 => Recommendation::Hire,
            40..=59 => Recommendation::Review,
            20..=39 => Recommendation::NoHire,
            _ => Recommendation::StrongNoHire,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default = "default_skill_level")]
    pub level: String,
}

fn default_skill_level() -> String {
    "intermediate".to_string()
}

impl Skill {
    pub fn detected(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: default_skill_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub summary: Option<String>,
    pub skills: Json<Vec<Skill>>,
    pub total_experience_years: f64,
    pub resume_key: Option<String>,
    pub resume_text: Option<String>,
    pub cover_letter: Option<String>,
    pub status: String,
    pub match_score: Option<f64>,
    pub ai_assessment: Option<String>,
    pub match_details: Option<Value>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub screened_at: Option<DateTime<Utc>>,
    pub interviewed_at: Option<DateTime<Utc>>,
}

impl CandidateRow {
    pub fn status(&self) -> CandidateStatus {
        self.status.parse().unwrap_or_default()
    }

    pub fn skill_names(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.name.clone()).collect()
    }
}

/// Body of `PUT /api/candidates/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateUpdate {
    pub status: Option<CandidateStatus>,
    pub match_score: Option<f64>,
    pub ai_assessment: Option<String>,
}

impl CandidateUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(score) = self.match_score {
            if !(0.0..=100.0).contains(&score) {
                return Err(AppError::Validation(
                    "match_score must be between 0 and 100".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_screening_reverts_only_in_flight_candidates() {
        assert_eq!(
            CandidateStatus::Screening.after_screening_failure(),
            CandidateStatus::Applied
        );
        for kept in [
            CandidateStatus::Applied,
            CandidateStatus::Shortlisted,
            CandidateStatus::InterviewScheduled,
            CandidateStatus::Offered,
            CandidateStatus::Hired,
            CandidateStatus::Rejected,
        ] {
            assert_eq!(kept.after_screening_failure(), kept);
        }
    }

    #[test]
    fn test_screening_threshold_is_inclusive() {
        assert_eq!(
            CandidateStatus::from_screening(60, 60),
            CandidateStatus::Shortlisted
        );
        assert_eq!(
            CandidateStatus::from_screening(59, 60),
            CandidateStatus::Rejected
        );
    }

    #[test]
    fn test_status_serde_is_snake_case() {
        let json = serde_json::to_string(&CandidateStatus::InterviewScheduled).unwrap();
        assert_eq!(json, r#""interview_scheduled""#);
        let parsed: CandidateStatus = serde_json::from_str(r#""shortlisted""#).unwrap();
        assert_eq!(parsed, CandidateStatus::Shortlisted);
    }

    #[test]
    fn test_unknown_status_is_validation_error() {
        assert!(matches!(
            "ghosted".parse::<CandidateStatus>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_recommendation_tiers() {
        assert_eq!(Recommendation::from_score(95), Recommendation::StrongHire);
        assert_eq!(Recommendation::from_score(80), Recommendation::StrongHire);
        assert_eq!(Recommendation::from_score(65), Recommendation::Hire);
        assert_eq!(Recommendation::from_score(40), Recommendation::Review);
        assert_eq!(Recommendation::from_score(25), Recommendation::NoHire);
        assert_eq!(Recommendation::from_score(5), Recommendation::StrongNoHire);
    }

    #[test]
    fn test_candidate_update_rejects_out_of_range_score() {
        let update = CandidateUpdate {
            match_score: Some(140.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
