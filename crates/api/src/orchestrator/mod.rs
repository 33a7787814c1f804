//! Background job orchestration.
//!
//! Drives a single job from `queued` to a terminal state: marks it running,
//! starts the scripted progress reporter, invokes the selected engine, and
//! applies the one-shot failover policy when the quality engine fails. The
//! submission handler returns before any of this runs; callers observe
//! outcomes only by polling job state.

pub mod progress;

use std::sync::Arc;
use std::time::Duration;

use mirage_core::engine::EngineKind;
use mirage_db::repositories::JobRepo;
use mirage_db::DbPool;
use mirage_engines::{EngineRegistry, RenderRequest};
use tokio_util::sync::CancellationToken;

use progress::ProgressReporter;

/// Progress value written when a job transitions to `running`.
const INITIAL_PROGRESS: i64 = 10;

/// Default delay between scripted progress ticks.
const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(800);

const MSG_ANALYZING: &str = "Analyzing spatial features...";
const MSG_SWITCHING: &str = "Engine fallback: switching to compatibility mode...";
const MSG_DONE: &str = "Done";

/// Drives jobs through `queued → running → {completed, failed}`.
///
/// One orchestrator instance is shared by all jobs; each submitted job runs
/// in its own spawned task with a nested progress-reporter task. The
/// orchestrator is the only writer of a job's orchestration fields, and the
/// reporter is cancelled and awaited before any terminal write, so the two
/// never race.
pub struct JobOrchestrator {
    pool: DbPool,
    registry: Arc<EngineRegistry>,
    progress_interval: Duration,
}

impl JobOrchestrator {
    pub fn new(pool: DbPool, registry: Arc<EngineRegistry>) -> Self {
        Self {
            pool,
            registry,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Override the progress tick cadence (tests shrink it).
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Run one job to a terminal state. Never returns an error and never
    /// panics past the engine boundary: every failure path ends in a
    /// persisted terminal job state.
    pub async fn run(&self, preferred: EngineKind, request: RenderRequest) {
        let job_id = request.job_id.clone();
        if let Err(e) = self.drive(preferred, &request).await {
            // A storage error interrupted orchestration. Final recourse is
            // to try once more to leave the job in a terminal state.
            tracing::error!(
                job_id = %job_id,
                error = %e,
                "Orchestration aborted by a storage error",
            );
            if let Err(e) = JobRepo::fail(&self.pool, &job_id, "Fatal error: internal storage failure").await {
                tracing::error!(
                    job_id = %job_id,
                    error = %e,
                    "Failed to persist terminal job state",
                );
            }
        }
    }

    /// The state machine for one job. Returns `Err` only for storage
    /// failures; engine failures are consumed by the failover policy and
    /// the terminal write.
    async fn drive(
        &self,
        preferred: EngineKind,
        request: &RenderRequest,
    ) -> Result<(), sqlx::Error> {
        let job_id = &request.job_id;
        tracing::info!(job_id = %job_id, engine = %preferred, "Worker picked up job");

        JobRepo::mark_running(&self.pool, job_id, INITIAL_PROGRESS, MSG_ANALYZING).await?;

        // Scripted progress runs concurrently with the engine call and is
        // cancelled as soon as the outcome is known.
        let cancel = CancellationToken::new();
        let reporter =
            ProgressReporter::new(self.pool.clone(), job_id.clone(), self.progress_interval);
        let reporter_handle = tokio::spawn(reporter.run(cancel.clone()));

        let mut selected = preferred;
        JobRepo::set_selected_engine(&self.pool, job_id, selected.as_str()).await?;

        let adapter = self.registry.resolve_kind(selected);
        let mut outcome = adapter.process(request).await;

        // One-shot failover: only the quality engine has a fallback edge,
        // and it is taken at most once per job.
        if let Err(primary_err) = &outcome {
            if let Some(fallback) = self.registry.fallback_for(selected) {
                tracing::warn!(
                    job_id = %job_id,
                    engine = %selected,
                    error = %primary_err,
                    fallback = %fallback,
                    "Engine failed, falling back",
                );
                let reason = primary_err.to_string();
                selected = fallback;
                JobRepo::record_fallback(
                    &self.pool,
                    job_id,
                    fallback.as_str(),
                    &reason,
                    MSG_SWITCHING,
                )
                .await?;
                outcome = self.registry.resolve_kind(fallback).process(request).await;
            }
        }

        // Stop the scripted ticks and wait the reporter out before the
        // terminal write, so no progress update can land after it.
        cancel.cancel();
        let _ = reporter_handle.await;

        match outcome {
            Ok(result_url) => {
                JobRepo::complete(&self.pool, job_id, MSG_DONE, &result_url).await?;
                tracing::info!(
                    job_id = %job_id,
                    engine = %selected,
                    result_url = %result_url,
                    "Job finalized",
                );
            }
            Err(err) => {
                tracing::error!(
                    job_id = %job_id,
                    engine = %selected,
                    error = %err,
                    "Job failed permanently",
                );
                JobRepo::fail(&self.pool, job_id, &format!("Fatal error: {err}")).await?;
            }
        }

        Ok(())
    }
}
