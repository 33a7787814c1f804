//! The InfiniteTalk adapter: higher-quality lip-sync, lower reliability.
//!
//! Requires its offline model weights on disk and fails with a simulated
//! subprocess error at `failure_rate` — in production that stands in for
//! the real engine's VRAM exhaustion and timeouts, and it is what exercises
//! the failover edge to Wan2GP.

use async_trait::async_trait;
use mirage_core::engine::EngineKind;
use rand::Rng;

use crate::adapter::{EngineAdapter, EngineSettings, RenderRequest};
use crate::download::INFINITETALK_MODEL_FILE;
use crate::error::EngineError;

pub struct InfiniteTalkAdapter {
    settings: EngineSettings,
}

impl InfiniteTalkAdapter {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl EngineAdapter for InfiniteTalkAdapter {
    fn kind(&self) -> EngineKind {
        EngineKind::Infinitetalk
    }

    async fn process(&self, request: &RenderRequest) -> Result<String, EngineError> {
        tracing::info!(job_id = %request.job_id, "[infinitetalk] starting generation");

        let model_path = self.settings.models_dir.join(INFINITETALK_MODEL_FILE);
        if !model_path.exists() {
            return Err(EngineError::ModelMissing {
                engine: EngineKind::Infinitetalk,
            });
        }

        // Simulated subprocess crash (CUDA OOM, timeout). The sampled roll
        // replaces a real exit-status check on the inference process.
        let roll: f64 = rand::rng().random();
        if roll < self.settings.failure_rate {
            tracing::warn!(
                job_id = %request.job_id,
                "[infinitetalk] simulated subprocess failure",
            );
            return Err(EngineError::Process(
                "InfiniteTalk engine subprocess hit a VRAM OOM error or timeout".into(),
            ));
        }

        tokio::time::sleep(self.settings.render_delay).await;

        let filename = format!("{}_infinitetalk.mp4", request.job_id);
        let output_path = self.settings.outputs_dir.join(&filename);
        tokio::fs::create_dir_all(&self.settings.outputs_dir).await?;
        tokio::fs::write(&output_path, b"mock infinitetalk video content").await?;

        tracing::info!(job_id = %request.job_id, "[infinitetalk] completed generation");
        Ok(format!("/data/outputs/{filename}"))
    }
}
