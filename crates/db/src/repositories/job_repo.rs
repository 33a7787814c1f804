//! Repository for the `jobs` table.
//!
//! Every orchestration update is a named transition that touches
//! `updated_at`; submission fields are written once at creation and never
//! again. Writers update only their own fields, so concurrent job tasks
//! never corrupt each other's rows.

use crate::models::job::{Job, NewJob};
use crate::models::status::JobStatus;
use crate::DbPool;

/// Column list for `jobs` queries.
const COLUMNS: &str = "\
    job_id, voice_id, avatar_url, script_mode, script_input, \
    preferred_engine, selected_engine, status, progress, message, \
    generated_script, result_url, fallback_reason, \
    created_at, updated_at";

/// CRUD and lifecycle transitions for generation jobs.
pub struct JobRepo;

impl JobRepo {
    /// Insert a freshly submitted job in `queued` status.
    pub async fn create(pool: &DbPool, input: &NewJob) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (job_id, voice_id, avatar_url, script_mode, script_input, \
                               preferred_engine, selected_engine, status, progress, message, \
                               generated_script) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, 'Queued', ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(&input.job_id)
            .bind(&input.voice_id)
            .bind(&input.avatar_url)
            .bind(&input.script_mode)
            .bind(&input.script_input)
            .bind(&input.preferred_engine)
            .bind(&input.preferred_engine)
            .bind(JobStatus::Queued)
            .bind(&input.generated_script)
            .fetch_one(pool)
            .await
    }

    /// Find a job by its id.
    pub async fn find_by_id(pool: &DbPool, job_id: &str) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE job_id = ?");
        sqlx::query_as::<_, Job>(&query)
            .bind(job_id)
            .fetch_optional(pool)
            .await
    }

    /// Transition a job to `running` with its initial progress and message.
    pub async fn mark_running(
        pool: &DbPool,
        job_id: &str,
        progress: i64,
        message: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE jobs SET status = ?, progress = ?, message = ?, \
                             updated_at = datetime('now') \
             WHERE job_id = ?",
        )
        .bind(JobStatus::Running)
        .bind(progress)
        .bind(message)
        .bind(job_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Record which engine is driving the job.
    pub async fn set_selected_engine(
        pool: &DbPool,
        job_id: &str,
        engine: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE jobs SET selected_engine = ?, updated_at = datetime('now') \
             WHERE job_id = ?",
        )
        .bind(engine)
        .bind(job_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Advance the scripted progress display.
    ///
    /// Guarded on `running` status so a straggling tick can never mutate a
    /// job that has already reached a terminal state.
    pub async fn update_progress(
        pool: &DbPool,
        job_id: &str,
        progress: i64,
        message: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE jobs SET progress = ?, message = ?, updated_at = datetime('now') \
             WHERE job_id = ? AND status = ?",
        )
        .bind(progress)
        .bind(message)
        .bind(job_id)
        .bind(JobStatus::Running)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Record a failover: the new engine, why the primary failed, and an
    /// interim message shown while the fallback attempt runs.
    pub async fn record_fallback(
        pool: &DbPool,
        job_id: &str,
        engine: &str,
        reason: &str,
        message: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE jobs SET selected_engine = ?, fallback_reason = ?, message = ?, \
                             updated_at = datetime('now') \
             WHERE job_id = ?",
        )
        .bind(engine)
        .bind(reason)
        .bind(message)
        .bind(job_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Terminal success: status `completed`, progress 100, result locator.
    pub async fn complete(
        pool: &DbPool,
        job_id: &str,
        message: &str,
        result_url: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE jobs SET status = ?, progress = 100, message = ?, result_url = ?, \
                             updated_at = datetime('now') \
             WHERE job_id = ?",
        )
        .bind(JobStatus::Completed)
        .bind(message)
        .bind(result_url)
        .bind(job_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Terminal failure: status `failed` with the final error description.
    pub async fn fail(pool: &DbPool, job_id: &str, message: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE jobs SET status = ?, message = ?, updated_at = datetime('now') \
             WHERE job_id = ?",
        )
        .bind(JobStatus::Failed)
        .bind(message)
        .bind(job_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
