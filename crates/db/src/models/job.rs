//! Job entity model and creation DTO.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use super::status::JobStatus;

/// A row from the `jobs` table.
///
/// The submission fields (`voice_id` through `preferred_engine`) are
/// write-once; the orchestration fields (`selected_engine`, `status`,
/// `progress`, `message`, `result_url`, `fallback_reason`) are owned by the
/// orchestrator driving the job.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub job_id: String,
    pub voice_id: String,
    pub avatar_url: String,
    pub script_mode: String,
    pub script_input: String,
    pub preferred_engine: String,
    pub selected_engine: String,
    pub status: JobStatus,
    pub progress: i64,
    pub message: String,
    pub generated_script: Option<String>,
    pub result_url: Option<String>,
    pub fallback_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Fields for inserting a freshly submitted job.
///
/// The job starts in `queued` status with progress 0; `selected_engine`
/// starts equal to `preferred_engine`.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub job_id: String,
    pub voice_id: String,
    pub avatar_url: String,
    pub script_mode: String,
    pub script_input: String,
    pub preferred_engine: String,
    pub generated_script: String,
}
