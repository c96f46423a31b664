use axum::{debug_handler, extract::State, Json};

use crate::{chat::Chat, requester::Requester, AppResult, AppState};

use super::Participant;

#[debug_handler(state = AppState)]
pub(crate) async fn heartbeat(
    State(chat): State<Chat>,
    Requester(name): Requester,
) -> AppResult<Json<Participant>> {
    Ok(Json(chat.heartbeat(&name).await?))
}
