use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{stream::BoxStream, StreamExt};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{clock::Clock, db, AppResult, ChatError};

use super::{Kind, Message, MessageFields, MessageStore, NewMessage};

// newest `?` visible rows, handed back oldest first; LIMIT -1 means all of them
const VISIBLE: &str = "SELECT id,sender,addressee,text,kind,time FROM (
    SELECT seq,id,sender,addressee,text,kind,time FROM messages
    WHERE kind IN ('status','broadcast') OR (kind='private' AND (sender=? OR addressee=?))
    ORDER BY seq DESC LIMIT ?
) ORDER BY seq ASC";

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: String,
    sender: String,
    addressee: String,
    text: String,
    kind: String,
    time: i64,
}

impl TryFrom<MessageRow> for Message {
    type Error = ChatError;

    fn try_from(row: MessageRow) -> AppResult<Message> {
        Ok(Message {
            id: Uuid::parse_str(&row.id).map_err(db::decode_error)?,
            from: row.sender,
            to: row.addressee,
            text: row.text,
            kind: row.kind.parse::<Kind>().map_err(db::decode_error)?,
            time: db::from_millis(row.time)?,
        })
    }
}

pub struct SqliteMessageStore {
    db_pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteMessageStore {
    pub fn new(db_pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { db_pool, clock }
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn append(&self, NewMessage { from, fields }: NewMessage) -> AppResult<Message> {
        let message = Message {
            id: Uuid::now_v7(),
            from,
            to: fields.to,
            text: fields.text,
            kind: fields.kind,
            time: db::millis_precision(self.clock.now()),
        };

        sqlx::query("INSERT INTO messages (id,sender,addressee,text,kind,time) VALUES (?,?,?,?,?,?)")
            .bind(message.id.to_string())
            .bind(&message.from)
            .bind(&message.to)
            .bind(&message.text)
            .bind(message.kind.as_str())
            .bind(db::to_millis(message.time))
            .execute(&self.db_pool)
            .await?;

        Ok(message)
    }

    fn query_visible<'a>(&'a self, requester: &'a str, limit: Option<i64>) -> BoxStream<'a, AppResult<Message>> {
        let limit = limit.filter(|n| *n > 0).unwrap_or(-1);

        sqlx::query_as::<_, MessageRow>(VISIBLE)
            .bind(requester)
            .bind(requester)
            .bind(limit)
            .fetch(&self.db_pool)
            .map(|row| row.map_err(ChatError::from).and_then(Message::try_from))
            .boxed()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Message> {
        sqlx::query_as::<_, MessageRow>("SELECT id,sender,addressee,text,kind,time FROM messages WHERE id=?")
            .bind(id.to_string())
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ChatError::NotFound(format!("message {id}")))?
            .try_into()
    }

    async fn update_by_id(&self, id: Uuid, MessageFields { to, text, kind }: MessageFields) -> AppResult<Message> {
        sqlx::query_as::<_, MessageRow>(
            "UPDATE messages SET addressee=?,text=?,kind=? WHERE id=? RETURNING id,sender,addressee,text,kind,time",
        )
            .bind(to)
            .bind(text)
            .bind(kind.as_str())
            .bind(id.to_string())
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ChatError::NotFound(format!("message {id}")))?
            .try_into()
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM messages WHERE id=?")
            .bind(id.to_string())
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ChatError::NotFound(format!("message {id}")));
        }
        Ok(())
    }
}
