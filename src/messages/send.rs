use axum::{debug_handler, extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{body::JsonBody, chat::Chat, requester::Requester, AppResult, AppState};

use super::schema::MessageBody;

#[debug_handler(state = AppState)]
pub(crate) async fn send(
    State(chat): State<Chat>,
    Requester(from): Requester,
    JsonBody(body): JsonBody<MessageBody>,
) -> AppResult<impl IntoResponse> {
    let message = chat.send(&from, &body).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
