use std::str::FromStr;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub sweep_period: std::time::Duration,
    pub stale_after: time::Duration,
}

impl Config {
    /// Reads settings from the environment, with `.env` loaded first.
    pub fn from_env() -> anyhow::Result<Config> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let sweep_secs: u64 = parse_or(&lookup, "SWEEP_PERIOD_SECS", 15)?;
        let stale_secs: i64 = parse_or(&lookup, "STALE_AFTER_SECS", 10)?;

        anyhow::ensure!(sweep_secs > 0, "SWEEP_PERIOD_SECS must be positive");
        anyhow::ensure!(stale_secs > 0, "STALE_AFTER_SECS must be positive");

        Ok(Config {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://chat.db?mode=rwc".to_owned()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:4000".to_owned()),
            max_connections: parse_or(&lookup, "MAX_CONNECTIONS", 16)?,
            sweep_period: std::time::Duration::from_secs(sweep_secs),
            stale_after: time::Duration::seconds(stale_secs),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("{key}={raw:?}")),
        None => Ok(default),
    }
}
