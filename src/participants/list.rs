use axum::{debug_handler, extract::State, Json};

use crate::{chat::Chat, AppResult, AppState};

use super::Participant;

#[debug_handler(state = AppState)]
pub(crate) async fn list(State(chat): State<Chat>) -> AppResult<Json<Vec<Participant>>> {
    Ok(Json(chat.participants().await?))
}
