//! Handlers for the `/jobs` resource.
//!
//! Submission validates synchronously (unknown voice, empty script,
//! unrecognized engine name) and returns before generation starts; all
//! later outcomes are observable only by polling job state.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mirage_core::engine::EngineKind;
use mirage_core::error::CoreError;
use mirage_core::ids::new_job_id;
use mirage_core::script::{build_script, ScriptMode};
use mirage_db::models::job::{Job, NewJob};
use mirage_db::models::status::JobStatus;
use mirage_db::repositories::{JobRepo, VoiceRepo};
use mirage_engines::RenderRequest;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Requested engine, a closed set: unknown names are rejected during
/// deserialization, before a job exists. `auto` maps to the registry's
/// default engine.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnginePreference {
    #[default]
    Auto,
    Wan2gp,
    Infinitetalk,
}

impl EnginePreference {
    fn resolve(self, default: EngineKind) -> EngineKind {
        match self {
            EnginePreference::Auto => default,
            EnginePreference::Wan2gp => EngineKind::Wan2gp,
            EnginePreference::Infinitetalk => EngineKind::Infinitetalk,
        }
    }
}

/// Body of `POST /api/jobs`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    pub voice_id: String,
    pub avatar_url: String,
    pub script_mode: ScriptMode,
    #[validate(length(min = 1, message = "script_input must not be empty"))]
    pub script_input: String,
    #[serde(default)]
    pub preferred_engine: EnginePreference,
    /// Opaque engine-specific options, passed through to the adapter.
    #[serde(default)]
    pub engine_options: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub job_id: String,
    pub selected_engine: EngineKind,
}

/// Body of `GET /api/jobs/{job_id}`.
///
/// `generated_script` and `result_url` are exposed only once the job has
/// completed.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub progress: i64,
    pub message: String,
    pub selected_engine: String,
    pub fallback_reason: Option<String>,
    pub generated_script: Option<String>,
    pub result_url: Option<String>,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        let completed = job.status == JobStatus::Completed;
        Self {
            job_id: job.job_id,
            status: job.status,
            progress: job.progress,
            message: job.message,
            selected_engine: job.selected_engine,
            fallback_reason: job.fallback_reason,
            generated_script: completed.then_some(job.generated_script).flatten(),
            result_url: completed.then_some(job.result_url).flatten(),
        }
    }
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/jobs
///
/// Validate the submission, persist the job as `queued`, and spawn the
/// orchestration task. Returns 201 with the job id and the engine the job
/// starts on.
pub async fn create_job(
    State(state): State<AppState>,
    Json(input): Json<CreateJobRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let voice = VoiceRepo::find_by_id(&state.pool, &input.voice_id).await?;
    if voice.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "unknown voice_id; clone a voice first".into(),
        )));
    }

    let engine = input.preferred_engine.resolve(state.registry.default_kind());
    let job_id = new_job_id();
    let generated_script = build_script(input.script_mode, &input.script_input);

    let job = JobRepo::create(
        &state.pool,
        &NewJob {
            job_id: job_id.clone(),
            voice_id: input.voice_id.clone(),
            avatar_url: input.avatar_url.clone(),
            script_mode: input.script_mode.as_str().to_string(),
            script_input: input.script_input.clone(),
            preferred_engine: engine.as_str().to_string(),
            generated_script: generated_script.clone(),
        },
    )
    .await?;

    tracing::info!(
        job_id = %job.job_id,
        engine = %engine,
        "Registered new job",
    );

    // Hand off to the orchestrator; the HTTP response does not wait for it.
    let orchestrator = state.orchestrator.clone();
    let request = RenderRequest {
        job_id: job_id.clone(),
        voice_id: input.voice_id,
        avatar_url: input.avatar_url,
        script_text: generated_script,
        options: input.engine_options,
    };
    tokio::spawn(async move {
        orchestrator.run(engine, request).await;
    });

    Ok((
        StatusCode::CREATED,
        Json(CreateJobResponse {
            job_id,
            selected_engine: engine,
        }),
    ))
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /api/jobs/{job_id}
///
/// Pure read of the current job state; safe to call at any time, including
/// before the job has finished.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let job = JobRepo::find_by_id(&state.pool, &job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;

    Ok(Json(JobStatusResponse::from(job)))
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// GET /api/jobs/{job_id}/result
///
/// Artifact retrieval: 404 unless the job exists and has completed. The
/// returned locator resolves to a retrievable file through the `/data`
/// static mount.
pub async fn get_job_result(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let job = JobRepo::find_by_id(&state.pool, &job_id).await?;

    match job {
        Some(job) if job.status == JobStatus::Completed => Ok(Json(json!({
            "status": "ready",
            "url": job.result_url,
        }))),
        _ => Err(AppError::Core(CoreError::NotFound {
            entity: "JobResult",
            id: job_id,
        })),
    }
}
