//! Public application endpoints. No recruiter auth; only active jobs are visible.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::candidates::queries::{find_by_email, insert_candidate, NewCandidate};
use crate::errors::AppError;
use crate::jobs::queries::{fetch_job, recalculate_job_counts};
use crate::models::job::{JobRow, Requirement, SalaryView};
use crate::screening::extract::{extract_text, is_allowed_extension, ALLOWED_EXTENSIONS};
use crate::state::AppState;
use crate::storage;

// ────────────────────────────────────────────────────────────────────────────
// Public job view
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PublicJob {
    pub id: Uuid,
    pub title: String,
    pub department: Option<String>,
    pub location: Option<String>,
    pub remote_option: bool,
    pub job_type: String,
    pub description: String,
    pub responsibilities: Vec<String>,
    pub benefits: Vec<String>,
    pub requirements: Vec<Requirement>,
    pub min_experience_years: f64,
    pub salary: Option<SalaryView>,
}

impl From<JobRow> for PublicJob {
    fn from(job: JobRow) -> Self {
        Self {
            description: job.public_description().to_string(),
            salary: job.salary(),
            id: job.id,
            title: job.title,
            department: job.department,
            location: job.location,
            remote_option: job.remote_option,
            job_type: job.job_type,
            responsibilities: job.responsibilities.0,
            benefits: job.benefits.0,
            requirements: job.requirements.0,
            min_experience_years: job.min_experience_years,
        }
    }
}

async fn fetch_open_job(state: &AppState, job_id: Uuid) -> Result<JobRow, AppError> {
    let job = fetch_job(&state.db, job_id).await?;
    if !job.is_active() {
        return Err(AppError::Validation(
            "This job is not accepting applications".to_string(),
        ));
    }
    Ok(job)
}

// ────────────────────────────────────────────────────────────────────────────
// Application form
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct ApplicationForm {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    linkedin_url: Option<String>,
    github_url: Option<String>,
    portfolio_url: Option<String>,
    cover_letter: Option<String>,
    resume: Option<(String, Bytes)>,
}

/// A form that passed validation; the resume is still unparsed.
#[derive(Debug)]
struct Application {
    name: String,
    email: String,
    phone: Option<String>,
    linkedin_url: Option<String>,
    github_url: Option<String>,
    portfolio_url: Option<String>,
    cover_letter: Option<String>,
    filename: String,
    resume: Bytes,
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

impl ApplicationForm {
    /// Unknown fields are ignored.
    fn set_text(&mut self, field: &str, value: String) {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "linkedin_url" => &mut self.linkedin_url,
            "github_url" => &mut self.github_url,
            "portfolio_url" => &mut self.portfolio_url,
            "cover_letter" => &mut self.cover_letter,
            _ => return,
        };
        *slot = non_blank(value);
    }

    fn validate(self, max_file_size: usize) -> Result<Application, AppError> {
        let name = self
            .name
            .ok_or_else(|| AppError::Validation("name is required".to_string()))?;
        let email = self
            .email
            .map(|e| e.to_lowercase())
            .ok_or_else(|| AppError::Validation("email is required".to_string()))?;
        if !looks_like_email(&email) {
            return Err(AppError::Validation(format!("'{email}' is not a valid email address")));
        }

        let (filename, resume) = self
            .resume
            .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
        if !is_allowed_extension(&filename) {
            return Err(AppError::Validation(format!(
                "Invalid file type. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
        if resume.len() > max_file_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File too large. Maximum size: {}MB",
                max_file_size / (1024 * 1024)
            )));
        }

        Ok(Application {
            name,
            email,
            phone: self.phone,
            linkedin_url: self.linkedin_url,
            github_url: self.github_url,
            portfolio_url: self.portfolio_url,
            cover_letter: self.cover_letter,
            filename,
            resume,
        })
    }
}

async fn read_form(mut multipart: Multipart) -> Result<ApplicationForm, AppError> {
    let mut form = ApplicationForm::default();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == "resume" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?;
            form.resume = Some((filename, data));
        } else {
            let value = field.text().await?;
            form.set_text(&name, value);
        }
    }
    Ok(form)
}

#[derive(Debug, Serialize)]
pub struct ApplicationReceipt {
    pub success: bool,
    pub candidate_id: Uuid,
    pub message: String,
    pub applied_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/apply/:job_id
pub async fn handle_get_open_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<PublicJob>, AppError> {
    Ok(Json(fetch_open_job(&state, job_id).await?.into()))
}

/// POST /api/apply/:job_id
///
/// Multipart form: `name`, `email`, optional contact fields, `cover_letter`
/// and the `resume` file. The resume text is extracted before anything is
/// stored so unreadable files are rejected up front.
pub async fn handle_submit_application(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApplicationReceipt>), AppError> {
    let job = fetch_open_job(&state, job_id).await?;
    let application = read_form(multipart)
        .await?
        .validate(state.config.max_file_size_bytes())?;

    if find_by_email(&state.db, job_id, &application.email).await?.is_some() {
        return Err(AppError::Conflict(
            "You have already applied for this position".to_string(),
        ));
    }

    let resume_text = extract_text(&application.filename, application.resume.clone()).await?;

    let candidate_id = Uuid::new_v4();
    let key = storage::resume_key(job_id, candidate_id, &application.name, &application.filename);
    storage::put_resume(&state.s3, &state.config.s3_bucket, &key, application.resume).await?;

    let new = NewCandidate {
        id: candidate_id,
        job_id,
        name: application.name,
        email: application.email,
        phone: application.phone,
        linkedin_url: application.linkedin_url,
        github_url: application.github_url,
        portfolio_url: application.portfolio_url,
        cover_letter: application.cover_letter,
        resume_key: key.clone(),
        resume_text,
    };
    let candidate = match insert_candidate(&state.db, &new).await {
        Ok(candidate) => candidate,
        Err(e) => {
            if let Err(cleanup) = storage::delete_resume(&state.s3, &state.config.s3_bucket, &key).await {
                warn!("Orphaned resume {key} after failed application: {cleanup}");
            }
            return Err(e);
        }
    };
    recalculate_job_counts(&state.db, job_id).await?;
    info!("New application {} for \"{}\"", candidate.id, job.title);

    Ok((
        StatusCode::CREATED,
        Json(ApplicationReceipt {
            success: true,
            candidate_id: candidate.id,
            message: format!(
                "Thank you for applying, {}! We will review your application and get back to you soon.",
                candidate.name
            ),
            applied_at: candidate.applied_at,
        }),
    ))
}

/// GET /api/apply/:job_id/check/:email
pub async fn handle_check_application(
    State(state): State<AppState>,
    Path((job_id, email)): Path<(Uuid, String)>,
) -> Result<Json<Value>, AppError> {
    let candidate = find_by_email(&state.db, job_id, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    Ok(Json(json!({
        "status": candidate.status,
        "message": candidate.status().applicant_message(),
        "applied_at": candidate.applied_at,
        "match_score": candidate.match_score,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: usize = 1024 * 1024;

    fn filled_form() -> ApplicationForm {
        let mut form = ApplicationForm::default();
        form.set_text("name", " Ada Lovelace ".to_string());
        form.set_text("email", "Ada@Example.com".to_string());
        form.set_text("phone", "   ".to_string());
        form.set_text("favourite_colour", "green".to_string());
        form.resume = Some(("cv.pdf".to_string(), Bytes::from_static(b"%PDF-1.4")));
        form
    }

    #[test]
    fn test_valid_form() {
        let app = filled_form().validate(10 * MB).unwrap();
        assert_eq!(app.name, "Ada Lovelace");
        assert_eq!(app.email, "ada@example.com");
        assert_eq!(app.phone, None);
        assert_eq!(app.filename, "cv.pdf");
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let mut form = filled_form();
        form.name = None;
        assert!(matches!(form.validate(MB), Err(AppError::Validation(_))));

        let mut form = filled_form();
        form.resume = None;
        assert!(matches!(form.validate(MB), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_bad_extension_is_400() {
        let mut form = filled_form();
        form.resume = Some(("cv.doc".to_string(), Bytes::from_static(b"\xd0\xcf")));
        let err = form.validate(MB).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains(".pdf, .docx, .txt")));
    }

    #[test]
    fn test_oversize_file_is_413() {
        let mut form = filled_form();
        form.resume = Some(("cv.txt".to_string(), Bytes::from(vec![b'a'; MB + 1])));
        assert!(matches!(form.validate(MB), Err(AppError::PayloadTooLarge(_))));
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("plain"));
    }
}
