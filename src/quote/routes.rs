//! Quote API route handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::AppState;

use super::editor::{QuoteEditor, QuoteSnapshot};
use super::models::QuoteBootstrap;
use super::requests::EditRequest;
use super::responses::{EditResponse, QuoteView, SessionResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/quotes/calculate", post(calculate))
        .route("/api/quotes/sessions", post(open_session))
        .route(
            "/api/quotes/sessions/:id",
            get(get_session).delete(close_session),
        )
        .route("/api/quotes/sessions/:id/edits", post(apply_edit))
        .route("/api/quotes/sessions/:id/snapshot", get(snapshot))
}

/// Settle a quote without keeping a session
async fn calculate(Json(bootstrap): Json<QuoteBootstrap>) -> Json<QuoteView> {
    let editor = QuoteEditor::open(bootstrap);
    Json(QuoteView::from(&editor))
}

async fn open_session(
    State(state): State<AppState>,
    Json(bootstrap): Json<QuoteBootstrap>,
) -> (StatusCode, Json<SessionResponse>) {
    let session = state.cache.open(QuoteEditor::open(bootstrap)).await;
    let view = QuoteView::from(&*session.lock().await);

    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: session.id,
            opened_at: session.opened_at,
            view,
        }),
    )
}

async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<QuoteView>> {
    let session = state.cache.get(id).await.ok_or(AppError::SessionNotFound(id))?;
    let editor = session.lock().await;
    Ok(Json(QuoteView::from(&*editor)))
}

/// Apply one edit; the response carries the settled state
async fn apply_edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<EditRequest>,
) -> Result<Json<EditResponse>> {
    let session = state.cache.get(id).await.ok_or(AppError::SessionNotFound(id))?;
    let edit = request.into_edit()?;

    let mut editor = session.lock().await;
    let outcome = editor.apply(edit)?;
    debug!("Edit applied to session {}: total {}", id, editor.total_cost());

    Ok(Json(EditResponse {
        created: outcome.created,
        view: QuoteView::from(&*editor),
    }))
}

/// Settled snapshot for the persistence collaborator
async fn snapshot(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<QuoteSnapshot>> {
    let session = state.cache.get(id).await.ok_or(AppError::SessionNotFound(id))?;
    let editor = session.lock().await;
    Ok(Json(editor.snapshot()))
}

async fn close_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    if state.cache.close(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::SessionNotFound(id))
    }
}
