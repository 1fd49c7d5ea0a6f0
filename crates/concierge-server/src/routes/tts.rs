use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use concierge::tts::{Audio, SpeechProvider, SpeechRequest};
use std::sync::Arc;

async fn synthesize(
    provider: Option<&Arc<dyn SpeechProvider>>,
    label: &'static str,
    request: SpeechRequest,
) -> Result<Response, ApiError> {
    let provider = provider.ok_or(ApiError::Unavailable(label))?;
    let Audio {
        bytes,
        content_type,
    } = provider.synthesize(&request).await?;

    tracing::debug!(provider = provider.name(), bytes = bytes.len(), "Synthesized speech");
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

async fn elevenlabs_handler(
    State(state): State<AppState>,
    Json(request): Json<SpeechRequest>,
) -> Result<Response, ApiError> {
    synthesize(state.elevenlabs.as_ref(), "ElevenLabs", request).await
}

async fn openai_handler(
    State(state): State<AppState>,
    Json(request): Json<SpeechRequest>,
) -> Result<Response, ApiError> {
    synthesize(state.openai_tts.as_ref(), "OpenAI speech", request).await
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/tts/elevenlabs", post(elevenlabs_handler))
        .route("/api/tts/openai", post(openai_handler))
        .with_state(state)
}
