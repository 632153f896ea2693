//! Session lifecycle and message rounds.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::agent::{Session, SessionSettings};

use super::types::{
    CreateSessionRequest, CreateSessionResponse, ErrorResponse, SendMessageRequest,
    SendMessageResponse,
};

/// In-memory session store. Sessions live as long as the process; the
/// conversation model has no persistence.
///
/// Each session sits behind its own lock, so one session runs at most one
/// round at a time while other sessions proceed independently.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: Session) -> Uuid {
        let id = session.id;
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }
}

pub fn routes() -> Router<Arc<super::routes::AppState>> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .route("/sessions/:id/messages", post(send_message))
}

fn not_found(id: Uuid) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Session {} not found", id),
        }),
    )
        .into_response()
}

async fn create_session(
    State(state): State<Arc<super::routes::AppState>>,
    body: Bytes,
) -> Response {
    // An empty body opens a session with the default settings.
    let req: CreateSessionRequest = if body.is_empty() {
        CreateSessionRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(r) => r,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Invalid request body: {}", e),
                    }),
                )
                    .into_response()
            }
        }
    };

    let defaults = SessionSettings::default();
    let settings = SessionSettings {
        capital: req.capital.unwrap_or(defaults.capital),
        profit_target: req.profit_target.unwrap_or(defaults.profit_target),
    };

    let session = Session::new(settings);
    let greeting = session.greeting().to_string();
    let id = state.sessions.insert(session).await;
    tracing::info!(%id, capital = settings.capital, profit_target = settings.profit_target, "session created");

    (
        StatusCode::CREATED,
        Json(CreateSessionResponse { id, greeting }),
    )
        .into_response()
}

async fn get_session(
    State(state): State<Arc<super::routes::AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    let Some(session) = state.sessions.get(id).await else {
        return not_found(id);
    };
    let session = session.lock().await;
    Json(session.clone()).into_response()
}

async fn delete_session(
    State(state): State<Arc<super::routes::AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    if state.sessions.remove(id).await {
        tracing::info!(%id, "session deleted");
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found(id)
    }
}

async fn send_message(
    State(state): State<Arc<super::routes::AppState>>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Response {
    let req: SendMessageRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid request body: {}", e),
                }),
            )
                .into_response()
        }
    };

    let Some(session) = state.sessions.get(id).await else {
        return not_found(id);
    };

    // Serializes rounds per session: a second message waits its turn here.
    let mut session = session.lock().await;
    match state.agent.handle_message(&mut session, &req.message).await {
        Ok(reply) => Json(SendMessageResponse { reply }).into_response(),
        Err(e) => {
            tracing::error!(%id, error = %e, "model call failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
