pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::apply::handlers as apply;
use crate::candidates::handlers as candidates;
use crate::jobs::handlers as jobs;
use crate::screening::handlers as screening;
use crate::state::AppState;

/// Room for the text fields that travel with the resume in the multipart body.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_file_size_bytes() + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .route("/api/jobs/:id/status", patch(jobs::handle_update_job_status))
        .route("/api/jobs/:id/publish", post(jobs::handle_publish_job))
        .route("/api/jobs/:id/stats", get(jobs::handle_job_stats))
        .route("/api/jobs/:id/analysis", get(jobs::handle_job_analysis))
        // Public applications
        .route(
            "/api/apply/:job_id",
            get(apply::handle_get_open_job)
                .post(apply::handle_submit_application)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/apply/:job_id/check/:email",
            get(apply::handle_check_application),
        )
        // Candidates
        .route(
            "/api/candidates/job/:job_id",
            get(candidates::handle_list_candidates),
        )
        .route(
            "/api/candidates/:id",
            get(candidates::handle_get_candidate)
                .put(candidates::handle_update_candidate)
                .delete(candidates::handle_delete_candidate),
        )
        .route(
            "/api/candidates/:id/status",
            patch(candidates::handle_update_candidate_status),
        )
        .route(
            "/api/candidates/:id/resume",
            get(candidates::handle_download_resume),
        )
        .route(
            "/api/candidates/:id/shortlist",
            post(candidates::handle_shortlist),
        )
        .route("/api/candidates/:id/reject", post(candidates::handle_reject))
        .route(
            "/api/candidates/:id/send-assessment",
            post(candidates::handle_send_assessment),
        )
        .route(
            "/api/candidates/:id/send-interview-invite",
            post(candidates::handle_send_interview_invite),
        )
        .route(
            "/api/candidates/:id/interviews",
            get(candidates::handle_list_interviews),
        )
        // Screening
        .route(
            "/api/screening/job/:job_id/screen",
            post(screening::handle_screen_job),
        )
        .route(
            "/api/screening/job/:job_id/optimize-jd",
            post(screening::handle_optimize_jd),
        )
        .route(
            "/api/screening/job/:job_id/extract-requirements",
            post(screening::handle_extract_requirements),
        )
        .route(
            "/api/screening/job/:job_id/results",
            get(screening::handle_screening_results),
        )
        .route(
            "/api/screening/candidate/:id/generate-questions",
            post(screening::handle_generate_questions),
        )
        .route(
            "/api/screening/candidate/:id/rescreen",
            post(screening::handle_rescreen),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aws_sdk_s3::config::{BehaviorVersion, Region};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::test_config;
    use crate::email::Mailer;
    use crate::llm_client::LlmClient;
    use crate::screening::screener::KeywordScreener;

    /// State whose clients never connect unless a handler reaches them.
    fn test_state() -> AppState {
        let config = test_config();
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool");
        let redis = redis::Client::open(config.redis_url.as_str()).expect("redis url");
        let s3 = aws_sdk_s3::Client::from_conf(
            aws_sdk_s3::Config::builder()
                .behavior_version(BehaviorVersion::latest())
                .region(Region::new("us-east-1"))
                .build(),
        );
        AppState {
            db,
            redis,
            s3,
            llm: LlmClient::new(config.anthropic_api_key.clone()),
            screener: Arc::new(KeywordScreener {
                weights: config.weights,
            }),
            mailer: Mailer::new(None, config.email_from.clone()),
            config,
        }
    }

    async fn send(method: Method, uri: &str) -> (StatusCode, Value) {
        let response = build_router(test_state())
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("handler should respond");
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn send_json(method: Method, uri: &str, json: Value) -> (StatusCode, Value) {
        let response = build_router(test_state())
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(json.to_string()))
                    .unwrap(),
            )
            .await
            .expect("handler should respond");
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_root() {
        let (status, body) = send(Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Smart Recruiter API");
    }

    #[tokio::test]
    async fn test_unknown_job_status_filter_is_400() {
        let (status, body) = send(Method::GET, "/api/jobs?status=archived").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_job_page_limit_is_400() {
        let (status, _) = send(Method::GET, "/api/jobs?limit=500").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_id_is_400() {
        let (status, _) = send(Method::GET, "/api/jobs/not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_candidate_status_filter_is_400() {
        let uri = format!("/api/candidates/job/{}?status=ghosted", uuid::Uuid::nil());
        let (status, body) = send(Method::GET, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("ghosted"));
    }

    #[tokio::test]
    async fn test_invite_with_bad_date_is_400() {
        let uri = format!(
            "/api/candidates/{}/send-interview-invite?interview_date=tomorrow",
            uuid::Uuid::nil()
        );
        let (status, _) = send(Method::POST, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_screen_limit_zero_is_400() {
        let uri = format!("/api/screening/job/{}/screen?limit=0", uuid::Uuid::nil());
        let (status, _) = send(Method::POST, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_interview_type_is_400() {
        let uri = format!(
            "/api/screening/candidate/{}/generate-questions?interview_type=panel",
            uuid::Uuid::nil()
        );
        let (status, _) = send(Method::POST, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_job_type_in_body_is_400() {
        let (status, body) = send_json(
            Method::POST,
            "/api/jobs",
            serde_json::json!({"title": "Dev", "description": "Build", "job_type": "gig"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("gig"));
    }

    #[tokio::test]
    async fn test_unknown_status_in_update_body_is_400() {
        let uri = format!("/api/jobs/{}", uuid::Uuid::nil());
        let (status, body) =
            send_json(Method::PUT, &uri, serde_json::json!({"status": "archived"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let uri = format!("/api/candidates/{}", uuid::Uuid::nil());
        let (status, body) =
            send_json(Method::PUT, &uri, serde_json::json!({"status": "ghosted"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_400() {
        let response = build_router(test_state())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/jobs")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"title\":"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = send(Method::GET, "/api/v1/context").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
