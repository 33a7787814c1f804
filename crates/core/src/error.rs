use thiserror::Error;

/// Domain-level error taxonomy shared by all crates.
///
/// Validation failures are surfaced synchronously at the submission
/// boundary; everything that happens after submission is reported through
/// persisted job state, never through this type.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
