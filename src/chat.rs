use std::sync::Arc;

use futures_util::{future, TryStreamExt};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    messages::{
        policy,
        schema::{self, MessageBody},
        Message, MessageStore, NewMessage,
    },
    participants::{Directory, Participant},
    sanitize, AppResult, ChatError,
};

/// Every action a client can take, over a shared directory and message store.
#[derive(Clone)]
pub struct Chat {
    directory: Arc<dyn Directory>,
    store: Arc<dyn MessageStore>,
}

impl Chat {
    pub fn new(directory: Arc<dyn Directory>, store: Arc<dyn MessageStore>) -> Chat {
        Chat { directory, store }
    }

    pub async fn join(&self, name: Option<&str>) -> AppResult<Participant> {
        let name = sanitize::required("name", name)?;

        let participant = self.directory.join(&name).await?;

        // the participant stays joined even if the announcement is lost
        match self.store.append(NewMessage::status(&name, "joined")).await {
            Ok(_) => info!("{name} joined"),
            Err(err) => warn!("{name} joined but could not announce it: {err}"),
        }
        Ok(participant)
    }

    pub async fn heartbeat(&self, name: &str) -> AppResult<Participant> {
        match self.directory.renew(name).await {
            Err(ChatError::NotFound(_)) => Err(ChatError::UnknownSender(name.to_owned())),
            result => result,
        }
    }

    pub async fn participants(&self) -> AppResult<Vec<Participant>> {
        self.directory.list().await
    }

    pub async fn send(&self, from: &str, body: &MessageBody) -> AppResult<Message> {
        let fields = schema::validate(body)?;

        let present = self.directory.find(from).await?.is_some();
        if !policy::can_send(present) {
            return Err(ChatError::UnknownSender(from.to_owned()));
        }

        self.store
            .append(NewMessage { from: from.to_owned(), fields })
            .await
    }

    pub async fn read(&self, requester: &str, limit: Option<i64>) -> AppResult<Vec<Message>> {
        if self.directory.find(requester).await?.is_none() {
            return Err(ChatError::UnknownSender(requester.to_owned()));
        }

        self.store
            .query_visible(requester, limit)
            .try_filter(|message| future::ready(policy::is_visible(message, requester)))
            .try_collect()
            .await
    }

    pub async fn edit(&self, requester: &str, id: &str, body: &MessageBody) -> AppResult<Message> {
        let fields = schema::validate(body)?;
        let message = self.owned_message(requester, id).await?;

        self.store.update_by_id(message.id, fields).await
    }

    pub async fn delete(&self, requester: &str, id: &str) -> AppResult<()> {
        let message = self.owned_message(requester, id).await?;

        self.store.delete_by_id(message.id).await?;
        info!("{requester} deleted message {id}");
        Ok(())
    }

    // existence first, then ownership
    async fn owned_message(&self, requester: &str, id: &str) -> AppResult<Message> {
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Err(ChatError::NotFound(format!("message {id}")));
        };

        let message = self.store.find_by_id(uuid).await?;
        if !policy::can_modify(&message, requester) {
            return Err(ChatError::Forbidden {
                requester: requester.to_owned(),
                id: id.to_owned(),
            });
        }

        Ok(message)
    }
}
