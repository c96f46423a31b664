use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use uuid::Uuid;

use crate::{
    messages::{Message, MessageFields, MessageStore, NewMessage, SqliteMessageStore},
    AppResult, ChatError,
};

/// Refuses every append sent by `refuse`, delegating everything else.
pub struct FlakyStore {
    pub inner: Arc<SqliteMessageStore>,
    pub refuse: &'static str,
}

#[async_trait]
impl MessageStore for FlakyStore {
    async fn append(&self, message: NewMessage) -> AppResult<Message> {
        if message.from == self.refuse {
            return Err(ChatError::StoreUnavailable(sqlx::Error::PoolClosed));
        }
        self.inner.append(message).await
    }

    fn query_visible<'a>(&'a self, requester: &'a str, limit: Option<i64>) -> BoxStream<'a, AppResult<Message>> {
        self.inner.query_visible(requester, limit)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Message> {
        self.inner.find_by_id(id).await
    }

    async fn update_by_id(&self, id: Uuid, fields: MessageFields) -> AppResult<Message> {
        self.inner.update_by_id(id, fields).await
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<()> {
        self.inner.delete_by_id(id).await
    }
}
