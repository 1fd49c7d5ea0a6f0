use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use concierge::voice::{AgentJoin, VoiceSession};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TokenRequest {
    agent_id: String,
}

#[derive(Debug, Deserialize)]
struct JoinRequest {
    agent_id: String,
    room_name: String,
}

async fn token_handler(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<VoiceSession>, ApiError> {
    let session = state.voice.create_session(&request.agent_id).await?;
    tracing::info!(room = %session.room_name, mock = session.mock, "Issued voice session");
    Ok(Json(session))
}

async fn join_handler(
    State(state): State<AppState>,
    Json(request): Json<JoinRequest>,
) -> Result<Json<AgentJoin>, ApiError> {
    let join = state
        .voice
        .join_agent(&request.agent_id, &request.room_name)
        .await?;
    Ok(Json(join))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/voice/token", post(token_handler))
        .route("/api/voice/join", post(join_handler))
        .with_state(state)
}
