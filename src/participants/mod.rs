mod directory;
mod join;
mod list;
mod status;

use async_trait::async_trait;
use axum::{routing::{get, post}, Router};
use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::{AppResult, AppState};

pub use directory::SqliteDirectory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub last_renewal: OffsetDateTime,
}

/// Who is currently in the room.
///
/// `evict_stale` is the only way a participant ever leaves.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Fails with `NameTaken` while any participant holds `name`.
    async fn join(&self, name: &str) -> AppResult<Participant>;

    /// Fails with `NotFound` when nobody holds `name`.
    async fn renew(&self, name: &str) -> AppResult<Participant>;

    async fn list(&self) -> AppResult<Vec<Participant>>;

    async fn find(&self, name: &str) -> AppResult<Option<Participant>>;

    /// Removes and returns everyone with `now - last_renewal >= threshold`.
    async fn evict_stale(&self, threshold: Duration, now: OffsetDateTime) -> AppResult<Vec<Participant>>;
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/participants", get(list::list).post(join::join))
        .route("/status", post(status::heartbeat))
}
