//! Repository for the `voices` table.

use crate::models::voice::Voice;
use crate::DbPool;

const COLUMNS: &str = "voice_id, engine, status, created_at";

/// CRUD operations for cloned voices.
pub struct VoiceRepo;

impl VoiceRepo {
    /// Insert a new voice record.
    pub async fn create(
        pool: &DbPool,
        voice_id: &str,
        engine: &str,
        status: &str,
    ) -> Result<Voice, sqlx::Error> {
        let query = format!(
            "INSERT INTO voices (voice_id, engine, status) VALUES (?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Voice>(&query)
            .bind(voice_id)
            .bind(engine)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    /// Find a voice by its id.
    pub async fn find_by_id(pool: &DbPool, voice_id: &str) -> Result<Option<Voice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM voices WHERE voice_id = ?");
        sqlx::query_as::<_, Voice>(&query)
            .bind(voice_id)
            .fetch_optional(pool)
            .await
    }
}
