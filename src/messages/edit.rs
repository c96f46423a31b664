use axum::{debug_handler, extract::{Path, State}, http::StatusCode, Json};

use crate::{body::JsonBody, chat::Chat, requester::Requester, AppResult, AppState};

use super::{schema::MessageBody, Message};

#[debug_handler(state = AppState)]
pub(crate) async fn edit(
    State(chat): State<Chat>,
    Path(id): Path<String>,
    Requester(requester): Requester,
    JsonBody(body): JsonBody<MessageBody>,
) -> AppResult<Json<Message>> {
    Ok(Json(chat.edit(&requester, &id, &body).await?))
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete(
    State(chat): State<Chat>,
    Path(id): Path<String>,
    Requester(requester): Requester,
) -> AppResult<StatusCode> {
    chat.delete(&requester, &id).await?;
    Ok(StatusCode::OK)
}
