use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use time::OffsetDateTime;

use crate::ChatError;

// participants: one row per present name
// messages: seq is the append order, id is what clients see
const SCHEMA: [&str; 2] = [
    "CREATE TABLE IF NOT EXISTS participants (
        name TEXT NOT NULL UNIQUE,
        last_renewal INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS messages (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        sender TEXT NOT NULL,
        addressee TEXT NOT NULL,
        text TEXT NOT NULL,
        kind TEXT NOT NULL,
        time INTEGER NOT NULL
    )",
];

pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    migrate(&db_pool).await?;
    Ok(db_pool)
}

/// Each in-memory connection is its own database, so this pool is pinned to
/// a single connection that is never recycled.
pub async fn memory() -> Result<SqlitePool, sqlx::Error> {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    migrate(&db_pool).await?;
    Ok(db_pool)
}

pub async fn migrate(db_pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(db_pool).await?;
    }
    Ok(())
}

/// Drops anything below a millisecond, the finest grain the tables keep.
pub(crate) fn millis_precision(at: OffsetDateTime) -> OffsetDateTime {
    at - time::Duration::nanoseconds((at.nanosecond() % 1_000_000) as i64)
}

pub(crate) fn to_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}

pub(crate) fn from_millis(millis: i64) -> Result<OffsetDateTime, ChatError> {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
        .map_err(decode_error)
}

pub(crate) fn decode_error<E>(err: E) -> ChatError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ChatError::StoreUnavailable(sqlx::Error::Decode(Box::new(err)))
}
