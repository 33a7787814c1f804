//! Route tree construction.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// The root-level health route.
pub fn health_router() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Build the `/api` route tree.
///
/// ```text
/// /voice/clone            POST  simulated voice cloning
/// /jobs                   POST  submit a generation job
/// /jobs/{job_id}          GET   poll job state
/// /jobs/{job_id}/result   GET   artifact locator for a completed job
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/voice/clone", post(handlers::voices::clone_voice))
        .route("/jobs", post(handlers::jobs::create_job))
        .route("/jobs/{job_id}", get(handlers::jobs::get_job_status))
        .route("/jobs/{job_id}/result", get(handlers::jobs::get_job_result))
}
