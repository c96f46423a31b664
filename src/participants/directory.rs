use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use time::{Duration, OffsetDateTime};

use crate::{clock::Clock, db, AppResult, ChatError};

use super::{Directory, Participant};

#[derive(sqlx::FromRow)]
struct ParticipantRow {
    name: String,
    last_renewal: i64,
}

impl TryFrom<ParticipantRow> for Participant {
    type Error = ChatError;

    fn try_from(ParticipantRow { name, last_renewal }: ParticipantRow) -> AppResult<Participant> {
        Ok(Participant {
            name,
            last_renewal: db::from_millis(last_renewal)?,
        })
    }
}

fn into_participants(rows: Vec<ParticipantRow>) -> AppResult<Vec<Participant>> {
    rows.into_iter().map(Participant::try_from).collect()
}

pub struct SqliteDirectory {
    db_pool: SqlitePool,
    clock: Arc<dyn Clock>,
    stale_after: Duration,
}

impl SqliteDirectory {
    /// `stale_after` decides when a held name may be taken over by a new join.
    pub fn new(db_pool: SqlitePool, clock: Arc<dyn Clock>, stale_after: Duration) -> Self {
        Self { db_pool, clock, stale_after }
    }
}

#[async_trait]
impl Directory for SqliteDirectory {
    async fn join(&self, name: &str) -> AppResult<Participant> {
        let now = self.clock.now();

        // a stale holder is replaced in place, a live one keeps the name
        sqlx::query_as::<_, ParticipantRow>(
            "INSERT INTO participants (name,last_renewal) VALUES (?,?)
            ON CONFLICT(name) DO UPDATE SET last_renewal=excluded.last_renewal
            WHERE participants.last_renewal<=?
            RETURNING name,last_renewal",
        )
            .bind(name)
            .bind(db::to_millis(now))
            .bind(db::to_millis(now - self.stale_after))
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ChatError::NameTaken(name.to_owned()))?
            .try_into()
    }

    async fn renew(&self, name: &str) -> AppResult<Participant> {
        let now = db::to_millis(self.clock.now());

        sqlx::query_as::<_, ParticipantRow>(
            "UPDATE participants SET last_renewal=? WHERE name=? RETURNING name,last_renewal",
        )
            .bind(now)
            .bind(name)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ChatError::NotFound(format!("participant {name}")))?
            .try_into()
    }

    async fn list(&self) -> AppResult<Vec<Participant>> {
        let rows = sqlx::query_as::<_, ParticipantRow>("SELECT name,last_renewal FROM participants")
            .fetch_all(&self.db_pool)
            .await?;

        into_participants(rows)
    }

    async fn find(&self, name: &str) -> AppResult<Option<Participant>> {
        sqlx::query_as::<_, ParticipantRow>("SELECT name,last_renewal FROM participants WHERE name=?")
            .bind(name)
            .fetch_optional(&self.db_pool)
            .await?
            .map(Participant::try_from)
            .transpose()
    }

    async fn evict_stale(&self, threshold: Duration, now: OffsetDateTime) -> AppResult<Vec<Participant>> {
        // a single statement, so two sweeps can never both claim a row
        let cutoff = db::to_millis(db::millis_precision(now) - threshold);

        let rows = sqlx::query_as::<_, ParticipantRow>(
            "DELETE FROM participants WHERE last_renewal<=? RETURNING name,last_renewal",
        )
            .bind(cutoff)
            .fetch_all(&self.db_pool)
            .await?;

        into_participants(rows)
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;

    use super::*;

    async fn directory() -> (SqliteDirectory, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(OffsetDateTime::UNIX_EPOCH + Duration::days(20_000)));
        let db_pool = db::memory().await.unwrap();
        (SqliteDirectory::new(db_pool, clock.clone(), Duration::seconds(10)), clock)
    }

    #[tokio::test]
    async fn join_then_find() {
        let (directory, clock) = directory().await;

        let joined = directory.join("alice").await.unwrap();
        assert_eq!(joined.last_renewal, clock.now());

        let found = directory.find("alice").await.unwrap().unwrap();
        assert_eq!(found, joined);
        assert!(directory.find("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_join_is_name_taken() {
        let (directory, _) = directory().await;

        directory.join("alice").await.unwrap();
        let err = directory.join("alice").await.unwrap_err();
        assert!(matches!(err, ChatError::NameTaken(name) if name == "alice"));
        assert_eq!(directory.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn renew_moves_the_clock_forward() {
        let (directory, clock) = directory().await;

        directory.join("alice").await.unwrap();
        clock.advance(Duration::seconds(7));

        let renewed = directory.renew("alice").await.unwrap();
        assert_eq!(renewed.name, "alice");
        assert_eq!(renewed.last_renewal, clock.now());
    }

    #[tokio::test]
    async fn renew_of_absent_name_is_not_found() {
        let (directory, _) = directory().await;
        let err = directory.renew("ghost").await.unwrap_err();
        assert!(matches!(err, ChatError::NotFound(_)));
    }

    #[tokio::test]
    async fn evicts_exactly_the_stale_and_only_once() {
        let (directory, clock) = directory().await;

        directory.join("old").await.unwrap();
        clock.advance(Duration::seconds(5));
        directory.join("fresh").await.unwrap();
        clock.advance(Duration::seconds(5));

        // old is exactly at the threshold, fresh is 5s short of it
        let now = clock.now();
        let evicted = directory.evict_stale(Duration::seconds(10), now).await.unwrap();
        assert_eq!(evicted.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(), ["old"]);

        assert!(directory.evict_stale(Duration::seconds(10), now).await.unwrap().is_empty());

        let remaining = directory.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "fresh");
    }

    #[tokio::test]
    async fn name_is_free_again_after_eviction() {
        let (directory, clock) = directory().await;

        directory.join("alice").await.unwrap();
        clock.advance(Duration::seconds(11));
        directory.evict_stale(Duration::seconds(10), clock.now()).await.unwrap();

        let rejoined = directory.join("alice").await.unwrap();
        assert_eq!(rejoined.last_renewal, clock.now());
    }

    #[tokio::test]
    async fn stale_name_can_be_rejoined_before_the_sweep() {
        let (directory, clock) = directory().await;

        directory.join("alice").await.unwrap();
        clock.advance(Duration::seconds(12));

        let rejoined = directory.join("alice").await.unwrap();
        assert_eq!(rejoined.last_renewal, clock.now());
        assert_eq!(directory.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn live_name_is_still_taken() {
        let (directory, clock) = directory().await;

        directory.join("alice").await.unwrap();
        clock.advance(Duration::seconds(5));

        let err = directory.join("alice").await.unwrap_err();
        assert!(matches!(err, ChatError::NameTaken(_)));
        assert_eq!(
            directory.find("alice").await.unwrap().unwrap().last_renewal,
            clock.now() - Duration::seconds(5),
        );
    }

    #[tokio::test]
    async fn eviction_boundary_is_exact_below_a_millisecond() {
        let clock = Arc::new(ManualClock::new(
            OffsetDateTime::UNIX_EPOCH + Duration::days(20_000) + Duration::nanoseconds(123_456_789),
        ));
        let directory = SqliteDirectory::new(db::memory().await.unwrap(), clock.clone(), Duration::seconds(10));

        let joined = directory.join("alice").await.unwrap();
        assert_eq!(joined.last_renewal, db::millis_precision(clock.now()));

        clock.advance(Duration::milliseconds(9_999));
        assert!(directory.evict_stale(Duration::seconds(10), clock.now()).await.unwrap().is_empty());

        clock.advance(Duration::milliseconds(1));
        let evicted = directory.evict_stale(Duration::seconds(10), clock.now()).await.unwrap();
        assert_eq!(evicted, [joined]);
    }
}
