//! Handlers for the `/voice` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mirage_core::engine::EngineKind;
use mirage_core::ids::new_voice_id;
use mirage_db::models::voice::VOICE_STATUS_READY;
use mirage_db::repositories::VoiceRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CloneVoiceResponse {
    pub voice_id: String,
    pub status: &'static str,
    pub engine: EngineKind,
}

/// POST /api/voice/clone
///
/// Simulated voice cloning: registers a ready-to-use voice immediately.
/// Jobs must reference a voice created here.
pub async fn clone_voice(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let voice_id = new_voice_id();
    let voice = VoiceRepo::create(
        &state.pool,
        &voice_id,
        EngineKind::Wan2gp.as_str(),
        VOICE_STATUS_READY,
    )
    .await?;

    tracing::info!(voice_id = %voice.voice_id, "Created new voice clone");

    Ok((
        StatusCode::CREATED,
        Json(CloneVoiceResponse {
            voice_id: voice.voice_id,
            status: VOICE_STATUS_READY,
            engine: EngineKind::Wan2gp,
        }),
    ))
}
