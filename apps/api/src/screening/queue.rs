//! Background screening queue on a Redis list.
//!
//! Producers LPUSH one JSON message per candidate; a single worker BRPOPs and
//! screens them one at a time. There is no retry: a failed screening is
//! recorded on the candidate and the worker moves on.

use std::time::Duration;

use redis::aio::MultiplexedConnection;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::candidates::queries::fetch_candidate;
use crate::errors::AppError;
use crate::jobs::queries::fetch_job;
use crate::screening::pipeline::screen_candidate;
use crate::screening::screener::ScreeningMode;
use crate::state::AppState;

pub const QUEUE_KEY: &str = "screening:queue";
/// Seconds BRPOP waits before the worker loops again.
const POP_TIMEOUT_SECS: f64 = 5.0;
const RECONNECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningTask {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
}

pub async fn enqueue(redis: &redis::Client, tasks: &[ScreeningTask]) -> Result<(), AppError> {
    if tasks.is_empty() {
        return Ok(());
    }
    let payloads = tasks
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Internal(e.into()))?;

    let mut conn = redis.get_multiplexed_async_connection().await?;
    redis::cmd("LPUSH")
        .arg(QUEUE_KEY)
        .arg(&payloads)
        .query_async::<_, i64>(&mut conn)
        .await?;

    info!("Queued {} candidates for screening", tasks.len());
    Ok(())
}

async fn process(state: &AppState, task: ScreeningTask) -> Result<(), AppError> {
    let candidate = fetch_candidate(&state.db, task.candidate_id).await?;
    let job = fetch_job(&state.db, task.job_id).await?;
    let outcome = screen_candidate(state, &candidate, &job, ScreeningMode::Full).await?;
    info!(
        "Worker finished candidate {}: {} -> {}",
        outcome.candidate_id, outcome.match_score, outcome.status
    );
    Ok(())
}

async fn pop(conn: &mut MultiplexedConnection) -> redis::RedisResult<Option<String>> {
    let popped: Option<(String, String)> = redis::cmd("BRPOP")
        .arg(QUEUE_KEY)
        .arg(POP_TIMEOUT_SECS)
        .query_async(conn)
        .await?;
    Ok(popped.map(|(_, payload)| payload))
}

/// Runs until the process exits. Redis errors drop the connection and the
/// worker reconnects after a short pause.
pub async fn run_worker(state: AppState) {
    info!("Screening worker listening on {QUEUE_KEY}");
    let mut conn: Option<MultiplexedConnection> = None;

    loop {
        if conn.is_none() {
            match state.redis.get_multiplexed_async_connection().await {
                Ok(c) => conn = Some(c),
                Err(e) => {
                    warn!("Screening worker cannot reach Redis: {e}");
                    tokio::time::sleep(RECONNECT_DELAY).await;
                    continue;
                }
            }
        }
        let Some(active) = conn.as_mut() else {
            continue;
        };

        let payload = match pop(active).await {
            Ok(Some(payload)) => payload,
            Ok(None) => continue,
            Err(e) => {
                warn!("Screening queue read failed, reconnecting: {e}");
                conn = None;
                tokio::time::sleep(RECONNECT_DELAY).await;
                continue;
            }
        };

        let task: ScreeningTask = match serde_json::from_str(&payload) {
            Ok(task) => task,
            Err(e) => {
                error!("Dropping malformed screening message {payload:?}: {e}");
                continue;
            }
        };

        info!("Dequeued candidate {} for job {}", task.candidate_id, task.job_id);
        if let Err(e) = process(&state, task).await {
            error!("Screening task for candidate {} failed: {e}", task.candidate_id);
        }
    }
}
