use anyhow::Result;
use tracing::info;

use quote_engine::config::Config;
use quote_engine::{app, init_tracing, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    let addr = config.socket_addr()?;
    let state = AppState::new(config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Quote engine listening on {}", addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
