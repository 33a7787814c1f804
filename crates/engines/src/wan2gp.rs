//! The Wan2GP adapter: the stable, always-available engine and the
//! failover target.
//!
//! A real deployment would shell out to the bundled Wan2GP renderer and
//! poll its stdout for progress markers; here the render is simulated by a
//! fixed delay and a placeholder artifact.

use async_trait::async_trait;
use mirage_core::engine::EngineKind;

use crate::adapter::{EngineAdapter, EngineSettings, RenderRequest};
use crate::error::EngineError;

pub struct Wan2gpAdapter {
    settings: EngineSettings,
}

impl Wan2gpAdapter {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl EngineAdapter for Wan2gpAdapter {
    fn kind(&self) -> EngineKind {
        EngineKind::Wan2gp
    }

    async fn process(&self, request: &RenderRequest) -> Result<String, EngineError> {
        tracing::info!(job_id = %request.job_id, "[wan2gp] starting generation");

        tokio::time::sleep(self.settings.render_delay).await;

        let filename = format!("{}_wan2gp.mp4", request.job_id);
        let output_path = self.settings.outputs_dir.join(&filename);
        tokio::fs::create_dir_all(&self.settings.outputs_dir).await?;
        tokio::fs::write(&output_path, b"mock wan2gp video content").await?;

        tracing::info!(job_id = %request.job_id, "[wan2gp] completed generation");
        Ok(format!("/data/outputs/{filename}"))
    }
}
