mod edit;
pub mod policy;
mod read;
pub mod schema;
mod send;
mod store;

use std::{fmt, str::FromStr};

use async_trait::async_trait;
use axum::{routing::{get, put}, Router};
use futures_util::stream::BoxStream;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{AppResult, AppState};

pub use store::SqliteMessageStore;

/// Addressee of every broadcast and status message.
pub const EVERYONE: &str = "everyone";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Broadcast,
    Private,
    Status,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        use Kind::*;
        match self {
            Broadcast => "broadcast",
            Private => "private",
            Status => "status",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown message kind {0:?}")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Kind, UnknownKind> {
        use Kind::*;
        match s {
            "broadcast" => Ok(Broadcast),
            "private" => Ok(Private),
            "status" => Ok(Status),
            _ => Err(UnknownKind(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: Kind,
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}

/// The part of a message its sender chooses, and the only part an edit may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFields {
    pub to: String,
    pub text: String,
    pub kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub from: String,
    pub fields: MessageFields,
}

impl NewMessage {
    pub fn status(from: &str, text: &str) -> NewMessage {
        NewMessage {
            from: from.to_owned(),
            fields: MessageFields {
                to: EVERYONE.to_owned(),
                text: text.to_owned(),
                kind: Kind::Status,
            },
        }
    }
}

/// Append-only message log. Append order is the history order.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Assigns `id` and `time`.
    async fn append(&self, message: NewMessage) -> AppResult<Message>;

    /// Everything `requester` may read, oldest first. A positive `limit`
    /// keeps only the newest `limit` of those.
    fn query_visible<'a>(&'a self, requester: &'a str, limit: Option<i64>) -> BoxStream<'a, AppResult<Message>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Message>;

    /// Replaces `to`, `text` and `kind`, keeping `id`, `from` and `time`.
    async fn update_by_id(&self, id: Uuid, fields: MessageFields) -> AppResult<Message>;

    async fn delete_by_id(&self, id: Uuid) -> AppResult<()>;
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", get(read::read).post(send::send))
        .route("/messages/{id}", put(edit::edit).delete(edit::delete))
}
