//! In-memory editing sessions using moka
//!
//! Each open quote lives in the cache behind its own lock, so an edit and its
//! recalculation finish before any snapshot read of the same session.

use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;
use uuid::Uuid;

use crate::config::SessionSettings;
use crate::quote::QuoteEditor;

/// One open quote
#[derive(Debug)]
pub struct EditingSession {
    pub id: Uuid,
    pub opened_at: DateTime<Utc>,
    editor: Mutex<QuoteEditor>,
}

impl EditingSession {
    pub async fn lock(&self) -> MutexGuard<'_, QuoteEditor> {
        self.editor.lock().await
    }
}

/// Open editing sessions keyed by session id
#[derive(Clone)]
pub struct SessionCache {
    sessions: Cache<Uuid, Arc<EditingSession>>,
}

impl SessionCache {
    pub fn new(settings: &SessionSettings) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(settings.max_capacity)
                .time_to_live(settings.time_to_live)
                .time_to_idle(settings.time_to_idle)
                .build(),
        }
    }

    /// Start a session for an opened quote
    pub async fn open(&self, editor: QuoteEditor) -> Arc<EditingSession> {
        let session = Arc::new(EditingSession {
            id: Uuid::new_v4(),
            opened_at: Utc::now(),
            editor: Mutex::new(editor),
        });
        self.sessions.insert(session.id, session.clone()).await;
        info!("Quote session opened: {}", session.id);
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<EditingSession>> {
        self.sessions.get(&id).await
    }

    /// Close a session. Returns false if it was not open.
    pub async fn close(&self, id: Uuid) -> bool {
        let closed = self.sessions.remove(&id).await.is_some();
        if closed {
            info!("Quote session closed: {}", id);
        }
        closed
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            open_sessions: self.sessions.entry_count(),
        }
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(&SessionSettings::default())
    }
}

/// Session statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub open_sessions: u64,
}
