//! Short prefixed identifiers for jobs and voices.
//!
//! Ids are the first eight hex characters of a v4 UUID with a type prefix,
//! e.g. `job_1f2e3d4c`. Short enough to read in logs, unique enough for a
//! single-node deployment.

use uuid::Uuid;

fn short_hex() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}

/// Generate a new job id (`job_<8 hex>`).
pub fn new_job_id() -> String {
    format!("job_{}", short_hex())
}

/// Generate a new voice id (`voice_<8 hex>`).
pub fn new_voice_id() -> String {
    format!("voice_{}", short_hex())
}
