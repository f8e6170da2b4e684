//! Transactional email over the Resend HTTP API.
//!
//! An account still in Resend's test mode may only mail its owner; those
//! rejections come back as `SendOutcome::Preview` so recruiters can see what
//! would have been sent.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;

pub mod templates;

pub use templates::EmailContent;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SendOutcome {
    Sent { email_id: Option<String> },
    Preview { to: String, subject: String },
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent { .. })
    }
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: Option<String>,
}

/// True when Resend refused the message only because the account is unverified.
pub fn is_test_mode_rejection(status: StatusCode, body: &str) -> bool {
    let body = body.to_lowercase();
    matches!(
        status,
        StatusCode::FORBIDDEN | StatusCode::UNPROCESSABLE_ENTITY
    ) && (body.contains("verify a domain") || body.contains("testing emails to your own email"))
}

#[derive(Clone)]
pub struct Mailer {
    client: Client,
    api_key: Option<String>,
    from: String,
}

impl Mailer {
    pub fn new(api_key: Option<String>, from: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            from,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn send(&self, email: &EmailContent, to: &str) -> Result<SendOutcome, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Email("Email service not configured".to_string()))?;

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(api_key)
            .json(&ResendRequest {
                from: &self.from,
                to: [to],
                subject: &email.subject,
                html: &email.html,
            })
            .send()
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: ResendResponse = response
                .json()
                .await
                .map_err(|e| AppError::Email(format!("unreadable Resend response: {e}")))?;
            info!("Sent \"{}\" to {to}", email.subject);
            return Ok(SendOutcome::Sent { email_id: body.id });
        }

        let body = response.text().await.unwrap_or_default();
        if is_test_mode_rejection(status, &body) {
            warn!("Resend is in test mode; \"{}\" to {to} returned as preview", email.subject);
            return Ok(SendOutcome::Preview {
                to: to.to_string(),
                subject: email.subject.clone(),
            });
        }

        Err(AppError::Email(format!("Resend returned {status}: {body}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_mode_rejection_detection() {
        assert!(is_test_mode_rejection(
            StatusCode::FORBIDDEN,
            r#"{"message":"You can only send testing emails to your own email address"}"#
        ));
        assert!(is_test_mode_rejection(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Please Verify a domain at resend.com/domains"
        ));
        assert!(!is_test_mode_rejection(
            StatusCode::UNAUTHORIZED,
            "verify a domain"
        ));
        assert!(!is_test_mode_rejection(StatusCode::FORBIDDEN, "invalid api key"));
    }

    #[tokio::test]
    async fn test_unconfigured_mailer_errors() {
        let mailer = Mailer::new(None, "hr@example.com".to_string());
        assert!(!mailer.is_configured());
        let email = EmailContent {
            subject: "Hi".to_string(),
            html: "<p>Hi</p>".to_string(),
        };
        let err = mailer.send(&email, "ada@example.com").await.unwrap_err();
        assert!(matches!(err, AppError::Email(msg) if msg.contains("not configured")));
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let preview = SendOutcome::Preview {
            to: "ada@example.com".to_string(),
            subject: "Hi".to_string(),
        };
        let value = serde_json::to_value(&preview).unwrap();
        assert_eq!(value["outcome"], "preview");
        assert_eq!(value["to"], "ada@example.com");
        assert!(!preview.is_sent());
    }
}
