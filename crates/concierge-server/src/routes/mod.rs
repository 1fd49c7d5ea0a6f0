pub mod chat;
pub mod health;
pub mod tts;
pub mod voice;

use crate::state::AppState;
use axum::Router;

pub fn configure(state: AppState) -> Router {
    Router::new()
        .merge(chat::routes(state.clone()))
        .merge(voice::routes(state.clone()))
        .merge(tts::routes(state))
        .merge(health::routes())
}
