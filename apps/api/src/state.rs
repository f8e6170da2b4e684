use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::email::Mailer;
use crate::llm_client::LlmClient;
use crate::screening::screener::CandidateScreener;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Backs the screening queue.
    pub redis: RedisClient,
    pub s3: S3Client,
    /// Used directly for JD work and interview packages; screening goes through `screener`.
    pub llm: LlmClient,
    pub config: Config,
    /// Selected at startup from `SCREENING_BACKEND`.
    pub screener: Arc<dyn CandidateScreener>,
    pub mailer: Mailer,
}
