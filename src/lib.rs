//! Quote engine service
//!
//! Cost aggregation for travel quotes, served over HTTP/JSON to the quote
//! editor front end.

pub mod config;
pub mod error;
pub mod quote;
pub mod routes;
pub mod session;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::session::SessionCache;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub cache: SessionCache,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            cache: SessionCache::new(&config.sessions),
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Build the HTTP application
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .merge(quote::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize tracing with `RUST_LOG` or the `info` level
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
