//! OpenSASE Storefront - cart, checkout and invoice pricing service

use anyhow::Result;
use opensase_storefront::{api, state::{spawn_idle_sweeper, AppState}, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = Config::from_env();
    let port = config.port;
    let idle = chrono::Duration::minutes(i64::from(config.session_idle_minutes));
    let state = AppState::new(config);
    spawn_idle_sweeper(state.store.clone(), idle);
    let app = api::router(state);

    tracing::info!("🚀 OpenSASE Storefront listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}
