use mirage_core::engine::EngineKind;
use thiserror::Error;

/// Failure of an engine's `process` call.
///
/// The orchestrator treats all variants the same way — the error's display
/// text becomes the persisted `fallback_reason` or failure message — but
/// the variants keep engine internals diagnosable in logs.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine's offline model weights are not present locally.
    #[error("{engine} offline model not found; restart the app to trigger the download")]
    ModelMissing { engine: EngineKind },

    /// The engine's subprocess crashed, timed out, or ran out of resources.
    #[error("{0}")]
    Process(String),

    /// The engine reported success but produced no output artifact.
    #[error("media generation failed silently (no output produced by engine)")]
    NoOutput,

    /// Filesystem error while staging inputs or writing the artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching surrogate model weights failed.
    #[error("model download failed: {0}")]
    Download(#[from] reqwest::Error),
}
