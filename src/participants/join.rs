use axum::{debug_handler, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use crate::{body::JsonBody, chat::Chat, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub(crate) struct JoinBody {
    name: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn join(
    State(chat): State<Chat>,
    JsonBody(JoinBody { name }): JsonBody<JoinBody>,
) -> AppResult<impl IntoResponse> {
    let participant = chat.join(name.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}
