use anyhow::Context;
use chat_room_server::{app, config::Config, store::Store, utils::clean};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::from_env().context("bad configuration")?;
    let store = Store::connect(&cfg.database_url, cfg.db_max_connections)
        .await
        .with_context(|| format!("cannot open database {}", cfg.database_url))?;

    tokio::spawn(clean::task(store.clone(), cfg.sweep_interval, cfg.presence_timeout)); // 啟動清道夫

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr())
        .await
        .with_context(|| format!("cannot bind {}", cfg.bind_addr()))?;
    tracing::info!(addr = %cfg.bind_addr(), "server is listening");

    axum::serve(listener, app(store).into_make_service()).await?;
    Ok(())
}
