use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use todo_core::PgStore;
use todo_server::{app, run, shutdown_signal, with_service_layers, Config, Credentials};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env()?;

    let store = PgStore::connect(&config.database_url, &config.pool_options())
        .await
        .context("failed to connect to database")?;
    store
        .bootstrap()
        .await
        .context("failed to bootstrap schema")?;

    let router = with_service_layers(
        app(Arc::new(store), config.credentials.clone()),
        config.request_timeout,
    );

    let listener = TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("failed to bind {}", config.addr()))?;
    info!(
        addr = %listener.local_addr()?,
        basic_auth_user = ?config.credentials.as_ref().map(Credentials::username),
        "listening"
    );

    run(listener, router, shutdown_signal()).await?;
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}
