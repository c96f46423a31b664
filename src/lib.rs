pub mod appresult;
pub mod body;
pub mod chat;
pub mod clock;
pub mod config;
pub mod db;
pub mod messages;
pub mod participants;
pub mod requester;
pub mod sanitize;
pub mod sweeper;
#[cfg(test)]
mod testutil;

use std::sync::Arc;

use axum::{extract::FromRef, Router};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use appresult::{AppResult, ChatError};

use chat::Chat;
use clock::Clock;
use messages::{MessageStore, SqliteMessageStore};
use participants::{Directory, SqliteDirectory};
use sweeper::Sweeper;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub chat: Chat,
}

/// The shared services, built once per process.
pub struct Services {
    pub directory: Arc<dyn Directory>,
    pub store: Arc<dyn MessageStore>,
    pub clock: Arc<dyn Clock>,
}

impl Services {
    /// `stale_after` is how long a silent name stays held before a new join may take it.
    pub fn sqlite(db_pool: SqlitePool, clock: Arc<dyn Clock>, stale_after: time::Duration) -> Services {
        Services {
            directory: Arc::new(SqliteDirectory::new(db_pool.clone(), clock.clone(), stale_after)),
            store: Arc::new(SqliteMessageStore::new(db_pool, clock.clone())),
            clock,
        }
    }

    pub fn chat(&self) -> Chat {
        Chat::new(self.directory.clone(), self.store.clone())
    }

    pub fn sweeper(&self, period: std::time::Duration, threshold: time::Duration) -> Sweeper {
        Sweeper::new(self.directory.clone(), self.store.clone(), self.clock.clone(), period, threshold)
    }
}

pub fn app(app_state: AppState) -> Router {
    Router::new()
        .merge(participants::router())
        .merge(messages::router())
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
