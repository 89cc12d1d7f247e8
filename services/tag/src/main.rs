use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context as _;
use sea_orm::{ConnectOptions, Database};
use tracing::info;

use vahan_core::config::Config as _;
use vahan_core::tracing::init_tracing;
use vahan_tag::config::TagConfig;
use vahan_tag::router::build_router;
use vahan_tag::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info,sqlx=warn");

    let config = TagConfig::from_env().context("failed to load configuration")?;

    let mut options = ConnectOptions::new(&config.database_url);
    options
        .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .context("failed to connect to database")?;

    let redis = deadpool_redis::Config::from_url(&config.redis_url)
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .context("failed to create Redis pool")?;

    let state = AppState::new(db, redis, &config.admin_key);
    let router = build_router(state, &config.cors_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.tag_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("tag service listening on {addr}");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;
    Ok(())
}
