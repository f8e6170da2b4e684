use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub interview_type: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_minutes: i32,
    pub interviewer_name: Option<String>,
    pub interviewer_email: Option<String>,
    pub is_remote: bool,
    pub meeting_link: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub invite_sent: bool,
    pub reminder_sent: bool,
    pub feedback: Option<String>,
    pub rating: Option<i32>,
    pub interview_kit: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
