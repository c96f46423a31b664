use std::sync::Arc;

use chatroom::{app, clock::SystemClock, config::Config, db, AppState, Services};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let db_pool = db::connect(&config.database_url, config.max_connections).await?;
    let services = Services::sqlite(db_pool, Arc::new(SystemClock), config.stale_after);

    let sweeper = services
        .sweeper(config.sweep_period, config.stale_after)
        .spawn();

    let app_state = AppState {
        chat: services.chat(),
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("running at http://{}", listener.local_addr()?);

    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    sweeper.abort();
    Ok(())
}
