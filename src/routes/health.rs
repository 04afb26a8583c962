//! Health check

use axum::{extract::State, Json};
use serde::Serialize;

use crate::session::SessionStats;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub sessions: SessionStats,
    /// Configured session cache capacity
    pub max_sessions: u64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        sessions: state.cache.stats(),
        max_sessions: state.config.sessions.max_capacity,
    })
}
