//! Generation engine adapters.
//!
//! Every backend the platform can render with is wrapped in an
//! [`adapter::EngineAdapter`] and resolved through an explicitly
//! constructed [`registry::EngineRegistry`]. The orchestrator in the api
//! crate sees engines only as `Result`-returning black boxes.

pub mod adapter;
pub mod download;
pub mod error;
pub mod infinitetalk;
pub mod registry;
pub mod wan2gp;

pub use adapter::{EngineAdapter, EngineSettings, RenderRequest};
pub use error::EngineError;
pub use registry::EngineRegistry;
