use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Which screener backs candidate scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreeningBackend {
    Llm,
    Keyword,
}

impl FromStr for ScreeningBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "llm" => Ok(ScreeningBackend::Llm),
            "keyword" => Ok(ScreeningBackend::Keyword),
            other => bail!("SCREENING_BACKEND must be 'llm' or 'keyword', got '{other}'"),
        }
    }
}

/// Relative weights of the keyword screener's score components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub culture: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.4,
            experience: 0.3,
            education: 0.2,
            culture: 0.1,
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.skills + self.experience + self.education + self.culture
    }

    fn validate(&self) -> Result<()> {
        let all = [self.skills, self.experience, self.education, self.culture];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            bail!("Scoring weights must be non-negative numbers");
        }
        if self.total() <= 0.0 {
            bail!("Scoring weights must not all be zero");
        }
        Ok(())
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub frontend_url: String,
    /// Shortlist threshold: screened candidates at or above it are shortlisted.
    pub min_match_score: u32,
    pub weights: ScoringWeights,
    pub max_file_size_mb: usize,
    pub screening_backend: ScreeningBackend,
    pub resend_api_key: Option<String>,
    pub email_from: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = ScoringWeights::default();
        let weights = ScoringWeights {
            skills: env_or("WEIGHT_SKILLS", defaults.skills)?,
            experience: env_or("WEIGHT_EXPERIENCE", defaults.experience)?,
            education: env_or("WEIGHT_EDUCATION", defaults.education)?,
            culture: env_or("WEIGHT_CULTURE", defaults.culture)?,
        };
        weights.validate()?;

        let min_match_score: u32 = env_or("MIN_MATCH_SCORE", 60)?;
        if min_match_score > 100 {
            bail!("MIN_MATCH_SCORE must be between 0 and 100");
        }

        let max_file_size_mb: usize = env_or("MAX_FILE_SIZE_MB", 10)?;
        if max_file_size_mb == 0 {
            bail!("MAX_FILE_SIZE_MB must be at least 1");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_or("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            min_match_score,
            weights,
            max_file_size_mb,
            screening_backend: env_or("SCREENING_BACKEND", ScreeningBackend::Llm)?,
            resend_api_key: std::env::var("RESEND_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "recruiter@example.com".to_string()),
        })
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/recruiter_test".to_string(),
        redis_url: "redis://127.0.0.1/".to_string(),
        s3_bucket: "resumes".to_string(),
        s3_endpoint: "http://127.0.0.1:9000".to_string(),
        aws_access_key_id: "minio".to_string(),
        aws_secret_access_key: "minio123".to_string(),
        anthropic_api_key: "test-key".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
        frontend_url: "http://localhost:5173".to_string(),
        min_match_score: 60,
        weights: ScoringWeights::default(),
        max_file_size_mb: 1,
        screening_backend: ScreeningBackend::Keyword,
        resend_api_key: None,
        email_from: "recruiter@example.com".to_string(),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = ScoringWeights::default();
        assert!((w.total() - 1.0).abs() < 1e-9);
        assert!(w.validate().is_ok());
    }

    #[test]
    fn test_zero_weights_rejected() {
        let w = ScoringWeights {
            skills: 0.0,
            experience: 0.0,
            education: 0.0,
            culture: 0.0,
        };
        assert!(w.validate().is_err());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let w = ScoringWeights {
            skills: -0.1,
            ..ScoringWeights::default()
        };
        assert!(w.validate().is_err());
    }

    #[test]
    fn test_screening_backend_parse() {
        assert_eq!(
            "LLM".parse::<ScreeningBackend>().unwrap(),
            ScreeningBackend::Llm
        );
        assert_eq!(
            " keyword ".parse::<ScreeningBackend>().unwrap(),
            ScreeningBackend::Keyword
        );
        assert!("crew".parse::<ScreeningBackend>().is_err());
    }
}
