//! Scripted progress reporting.
//!
//! Engines report only success or failure, so user-facing progress is a
//! fixed sequence of staged updates emitted on a timer, deliberately
//! decoupled from what the engine is actually doing.

use std::time::Duration;

use mirage_db::repositories::JobRepo;
use mirage_db::DbPool;
use tokio_util::sync::CancellationToken;

/// The staged (progress, message) sequence. `mark_running` sets 10 before
/// the first tick, and the terminal write sets 100, so progress is
/// non-decreasing across the whole lifecycle.
const STAGES: [(i64, &str); 4] = [
    (30, "Preprocessing audio..."),
    (50, "Driving lip-sync..."),
    (70, "Relighting the face..."),
    (90, "Rendering frames..."),
];

/// Emits the scripted progress sequence for one job until it finishes or
/// is cancelled by the orchestrator.
pub struct ProgressReporter {
    pool: DbPool,
    job_id: String,
    tick: Duration,
}

impl ProgressReporter {
    pub fn new(pool: DbPool, job_id: String, tick: Duration) -> Self {
        Self { pool, job_id, tick }
    }

    /// Sleep-and-update through [`STAGES`]. This is the single point where
    /// cancellation is observed; it is swallowed here and never surfaces
    /// as a job error.
    pub async fn run(self, cancel: CancellationToken) {
        for (progress, message) in STAGES {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(self.tick) => {}
            }

            if let Err(e) =
                JobRepo::update_progress(&self.pool, &self.job_id, progress, message).await
            {
                tracing::error!(
                    job_id = %self.job_id,
                    error = %e,
                    "Failed to record progress tick",
                );
            }
        }
    }
}
