//! Offline model download simulation.
//!
//! A real deployment pulls multi-gigabyte safetensors; here each engine
//! gets a tiny surrogate file fetched once at startup so the "weights on
//! disk" precondition and its failure mode stay realistic. Files already
//! present are left untouched.

use std::path::Path;

use mirage_core::engine::EngineKind;

use crate::error::EngineError;

/// Surrogate weight file for the Wan2GP engine.
pub const WAN2GP_MODEL_FILE: &str = "wan2gp_mock.json";

/// Surrogate weight file for the InfiniteTalk engine.
pub const INFINITETALK_MODEL_FILE: &str = "infinitetalk_mock.json";

/// Public source for the surrogate files (a small config blob).
const MODEL_SOURCE_URL: &str =
    "https://huggingface.co/bert-base-uncased/resolve/main/config.json";

/// Ensure each engine's surrogate weights exist under `models_dir`,
/// downloading any that are missing.
pub async fn ensure_models(models_dir: &Path) -> Result<(), EngineError> {
    tokio::fs::create_dir_all(models_dir).await?;

    for (engine, filename) in [
        (EngineKind::Wan2gp, WAN2GP_MODEL_FILE),
        (EngineKind::Infinitetalk, INFINITETALK_MODEL_FILE),
    ] {
        let target = models_dir.join(filename);
        if target.exists() {
            tracing::info!(%engine, "Offline model already present");
            continue;
        }

        tracing::info!(%engine, "Downloading offline model weights");
        let bytes = reqwest::get(MODEL_SOURCE_URL)
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        tokio::fs::write(&target, &bytes).await?;
        tracing::info!(%engine, path = %target.display(), "Offline model saved");
    }

    Ok(())
}
