//! Storefront - in-memory e-commerce storefront

use anyhow::Result;
use storefront::{routes, AppState, StorefrontConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "storefront=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::from_env()?;
    let addr = config.socket_addr();
    let state = AppState::from_config(config)?;
    tracing::info!(products = state.catalog().len(), "catalog loaded");

    let app = routes::router(state);
    tracing::info!("🚀 Storefront listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
