use std::sync::Arc;

use crate::config::ServerConfig;
use crate::orchestrator::JobOrchestrator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool — the system of record for jobs and voices.
    pub pool: mirage_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Engine registry, constructed once at startup and injected here.
    pub registry: Arc<mirage_engines::EngineRegistry>,
    /// Background job orchestrator; submission handlers spawn one task per
    /// job through it.
    pub orchestrator: Arc<JobOrchestrator>,
}
