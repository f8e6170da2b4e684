use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// Lifecycle of a job posting. Only `Active` jobs accept applications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Closed,
    Filled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Active => "active",
            JobStatus::Paused => "paused",
            JobStatus::Closed => "closed",
            JobStatus::Filled => "filled",
        }
    }
}

impl FromStr for JobStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(JobStatus::Draft),
            "active" => Ok(JobStatus::Active),
            "paused" => Ok(JobStatus::Paused),
            "closed" => Ok(JobStatus::Closed),
            "filled" => Ok(JobStatus::Filled),
            other => Err(AppError::Validation(format!("Unknown job status '{other}'"))),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
    Freelance,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full_time",
            JobType::PartTime => "part_time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
            JobType::Freelance => "freelance",
        }
    }
}

/// Seniority band a job is hiring for. Drives the experience-fit check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    #[default]
    Mid,
    Senior,
    Lead,
    Executive,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
            ExperienceLevel::Executive => "executive",
        }
    }

    /// Inclusive band of years considered a natural fit for the level.
    pub fn expected_years(&self) -> (f64, f64) {
        match self {
            ExperienceLevel::Entry => (0.0, 2.0),
            ExperienceLevel::Mid => (2.0, 5.0),
            ExperienceLevel::Senior => (5.0, 10.0),
            ExperienceLevel::Lead => (8.0, 15.0),
            ExperienceLevel::Executive => (0.0, 100.0),
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entry" => Ok(ExperienceLevel::Entry),
            "mid" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            "lead" => Ok(ExperienceLevel::Lead),
            "executive" => Ok(ExperienceLevel::Executive),
            other => Err(AppError::Validation(format!(
                "Unknown experience level '{other}'"
            ))),
        }
    }
}

fn default_level() -> String {
    "intermediate".to_string()
}

fn default_true() -> bool {
    true
}

fn default_weight() -> f64 {
    1.0
}

/// A skill requirement attached to a job. `required = false` means nice-to-have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub skill: String,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Requirement {
    pub fn required(skill: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            level: default_level(),
            required: true,
            weight: default_weight(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_period() -> String {
    "yearly".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_period")]
    pub period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub department: Option<String>,
    pub location: Option<String>,
    pub remote_option: bool,
    pub job_type: String,
    pub experience_level: String,
    pub description: String,
    pub optimized_description: Option<String>,
    pub responsibilities: Json<Vec<String>>,
    pub benefits: Json<Vec<String>>,
    pub requirements: Json<Vec<Requirement>>,
    pub min_experience_years: f64,
    pub education_required: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_currency: String,
    pub status: String,
    pub total_applicants: i32,
    pub screened_count: i32,
    pub shortlisted_count: i32,
    pub interviewed_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl JobRow {
    pub fn is_active(&self) -> bool {
        self.status == JobStatus::Active.as_str()
    }

    /// Falls back to `Mid` for rows written before a level was validated.
    pub fn level(&self) -> ExperienceLevel {
        self.experience_level.parse().unwrap_or_default()
    }

    pub fn application_link(&self) -> String {
        format!("/apply/{}", self.id)
    }

    /// The description candidates see: the optimized version once accepted.
    pub fn public_description(&self) -> &str {
        self.optimized_description
            .as_deref()
            .unwrap_or(&self.description)
    }

    pub fn salary(&self) -> Option<SalaryView> {
        if self.salary_min.is_none() && self.salary_max.is_none() {
            return None;
        }
        Some(SalaryView {
            min: self.salary_min,
            max: self.salary_max,
            currency: self.salary_currency.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SalaryView {
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub currency: String,
}

/// Body of `POST /api/jobs`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobCreate {
    pub title: String,
    pub description: String,
    pub department: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub remote_option: bool,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub min_experience_years: f64,
    pub education_required: Option<String>,
    pub salary: Option<SalaryRange>,
}

impl JobCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::Validation(
                "description cannot be empty".to_string(),
            ));
        }
        if !self.min_experience_years.is_finite() || self.min_experience_years < 0.0 {
            return Err(AppError::Validation(
                "min_experience_years must be a non-negative number".to_string(),
            ));
        }
        if let Some(salary) = &self.salary {
            if let (Some(min), Some(max)) = (salary.min_salary, salary.max_salary) {
                if min > max {
                    return Err(AppError::Validation(
                        "salary.min_salary cannot exceed salary.max_salary".to_string(),
                    ));
                }
            }
        }
        validate_requirements(&self.requirements)
    }
}

/// Body of `PUT /api/jobs/:id`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub optimized_description: Option<String>,
    pub status: Option<JobStatus>,
    pub requirements: Option<Vec<Requirement>>,
}

impl JobUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        if matches!(&self.description, Some(d) if d.trim().is_empty()) {
            return Err(AppError::Validation(
                "description cannot be empty".to_string(),
            ));
        }
        match &self.requirements {
            Some(reqs) => validate_requirements(reqs),
            None => Ok(()),
        }
    }
}

fn validate_requirements(requirements: &[Requirement]) -> Result<(), AppError> {
    for req in requirements {
        if req.skill.trim().is_empty() {
            return Err(AppError::Validation(
                "requirement skill cannot be empty".to_string(),
            ));
        }
        if !req.weight.is_finite() || req.weight < 0.0 {
            return Err(AppError::Validation(format!(
                "requirement '{}' has an invalid weight",
                req.skill
            )));
        }
    }
    Ok(())
}

/// Active job row for unit tests that never touch the database.
#[cfg(test)]
pub(crate) fn test_job(description: &str, requirements: Vec<Requirement>) -> JobRow {
    let now = Utc::now();
    JobRow {
        id: Uuid::new_v4(),
        title: "Backend Engineer".to_string(),
        department: Some("Engineering".to_string()),
        location: None,
        remote_option: true,
        job_type: JobType::FullTime.as_str().to_string(),
        experience_level: ExperienceLevel::Senior.as_str().to_string(),
        description: description.to_string(),
        optimized_description: None,
        responsibilities: Json(vec![]),
        benefits: Json(vec![]),
        requirements: Json(requirements),
        min_experience_years: 0.0,
        education_required: None,
        salary_min: None,
        salary_max: None,
        salary_currency: "USD".to_string(),
        status: JobStatus::Active.as_str().to_string(),
        total_applicants: 0,
        screened_count: 0,
        shortlisted_count: 0,
        interviewed_count: 0,
        created_at: now,
        updated_at: now,
        published_at: Some(now),
        closed_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_body(title: &str, description: &str) -> JobCreate {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "description": description,
        }))
        .unwrap()
    }

    #[test]
    fn test_requirement_defaults_apply() {
        let req: Requirement = serde_json::from_str(r#"{"skill": "Python"}"#).unwrap();
        assert_eq!(req.level, "intermediate");
        assert!(req.required);
        assert_eq!(req.weight, 1.0);
    }

    #[test]
    fn test_job_create_defaults() {
        let body = create_body("Backend Engineer", "Build APIs");
        assert_eq!(body.job_type, JobType::FullTime);
        assert_eq!(body.experience_level, ExperienceLevel::Mid);
        assert!(body.requirements.is_empty());
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_job_create_rejects_blank_title() {
        let body = create_body("   ", "Build APIs");
        assert!(matches!(body.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_job_create_rejects_inverted_salary() {
        let mut body = create_body("Engineer", "Build APIs");
        body.salary = Some(SalaryRange {
            min_salary: Some(200_000),
            max_salary: Some(100_000),
            currency: "USD".to_string(),
            period: "yearly".to_string(),
        });
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_job_status_parse_roundtrip() {
        for status in [
            JobStatus::Draft,
            JobStatus::Active,
            JobStatus::Paused,
            JobStatus::Closed,
            JobStatus::Filled,
        ] {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
        assert!("archived".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_experience_level_bands() {
        assert_eq!(ExperienceLevel::Senior.expected_years(), (5.0, 10.0));
        assert_eq!(ExperienceLevel::Entry.expected_years(), (0.0, 2.0));
    }

    #[test]
    fn test_job_update_rejects_empty_requirement_skill() {
        let update = JobUpdate {
            requirements: Some(vec![Requirement::required("")]),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
