//! Cloned voice model.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `voices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Voice {
    pub voice_id: String,
    pub engine: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// Status value for a voice that is ready for use in jobs.
pub const VOICE_STATUS_READY: &str = "ready";
