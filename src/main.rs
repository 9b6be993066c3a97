//! matjar - bilingual storefront and admin API

use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matjar::{handlers, notify, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let notifier = notify::Notifier::new(Duration::from_secs(config.toast_ttl_secs));
    tokio::spawn(notify::run_poller(
        db.clone(),
        notifier.clone(),
        Duration::from_secs(config.poll_interval_secs),
    ));

    let port = config.port;
    let state = AppState::new(db, config, notifier);
    let app = handlers::router(state);

    tracing::info!("🚀 matjar listening on 0.0.0.0:{}", port);
    axum::serve(
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?,
        app,
    )
    .await?;
    Ok(())
}
