//! The uniform engine capability contract.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use mirage_core::engine::EngineKind;

use crate::error::EngineError;

/// Inputs for one generation run, identical across engines.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub job_id: String,
    pub voice_id: String,
    pub avatar_url: String,
    /// The final narration script (already expanded from the submission).
    pub script_text: String,
    /// Opaque engine-specific options, passed through from the submission.
    pub options: serde_json::Value,
}

/// An interchangeable generation backend.
///
/// Implementations may download assets, spawn subprocesses, or poll output
/// streams internally; none of that is visible to callers, who observe only
/// the returned locator or an [`EngineError`]. The returned locator is the
/// sole authoritative reference to the artifact even when the adapter also
/// writes it to the outputs directory as a side channel.
#[async_trait]
pub trait EngineAdapter: Send + Sync {
    /// Stable engine identity. Constant, no side effects.
    fn kind(&self) -> EngineKind;

    /// Run the generation work for one job. Suspends for the duration of
    /// the (simulated or real) render.
    async fn process(&self, request: &RenderRequest) -> Result<String, EngineError>;
}

/// Shared adapter configuration.
///
/// Tests shrink `render_delay` to zero and pin `failure_rate` to 0.0 or 1.0
/// to make engine behaviour deterministic.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Where adapters write their artifact side channel.
    pub outputs_dir: PathBuf,
    /// Where offline model weights live.
    pub models_dir: PathBuf,
    /// Simulated render duration.
    pub render_delay: Duration,
    /// Probability in `[0, 1]` that InfiniteTalk fails with a simulated
    /// subprocess error.
    pub failure_rate: f64,
}

impl EngineSettings {
    /// Production defaults rooted at the data directory: a 4-second render
    /// and the 50% InfiniteTalk failure rate that demonstrates failover.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            outputs_dir: data_dir.join("outputs"),
            models_dir: data_dir.join("models"),
            render_delay: Duration::from_secs(4),
            failure_rate: 0.5,
        }
    }
}
