use axum::{debug_handler, extract::{Query, State}, Json};
use serde::Deserialize;

use crate::{chat::Chat, requester::Requester, AppResult, AppState};

use super::Message;

#[derive(Debug, Deserialize)]
pub(crate) struct ReadQuery {
    limit: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn read(
    State(chat): State<Chat>,
    Requester(requester): Requester,
    Query(ReadQuery { limit }): Query<ReadQuery>,
) -> AppResult<Json<Vec<Message>>> {
    // anything that isn't a number means "everything"
    let limit = limit.and_then(|limit| limit.trim().parse::<i64>().ok());

    Ok(Json(chat.read(&requester, limit).await?))
}
