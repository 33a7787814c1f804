//! Startup environment setup: data directories and offline models.

use std::path::PathBuf;

use tokio::task::JoinHandle;

use crate::config::ServerConfig;

/// Ensure the writable data tree exists before the pool and the engines
/// touch it.
pub async fn ensure_data_dirs(config: &ServerConfig) -> std::io::Result<()> {
    for dir in [
        config.data_dir.clone(),
        config.uploads_dir(),
        config.cache_dir(),
        config.outputs_dir(),
        config.models_dir(),
    ] {
        tokio::fs::create_dir_all(&dir).await?;
        tracing::debug!(dir = %dir.display(), "Ensured directory exists");
    }
    Ok(())
}

/// Fetch missing offline engine models in the background.
///
/// Download failures are logged but do not block startup: jobs on an
/// engine without weights fail at the adapter and fall over instead.
pub fn spawn_model_download(models_dir: PathBuf) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = mirage_engines::download::ensure_models(&models_dir).await {
            tracing::warn!(
                error = %e,
                "Offline model download failed; affected engines will fail over",
            );
        }
    })
}
