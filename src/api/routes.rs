//! Router assembly and shared application state.

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::agent::Agent;
use crate::config::Config;
use crate::gateway::Gateway;
use crate::llm::{LlmClient, OpenAiClient};

use super::sessions::SessionStore;
use super::types::HealthResponse;

/// Shared state handed to every handler.
pub struct AppState {
    pub gateway: Gateway,
    pub agent: Agent,
    pub sessions: SessionStore,
}

impl AppState {
    /// Wire the full application state from configuration.
    pub fn from_config(config: &Config) -> Self {
        let gateway = Gateway::new(config.gateway.clone());
        let llm: Arc<dyn LlmClient> = Arc::new(OpenAiClient::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
        ));
        let agent = Agent::new(config.default_model.clone(), llm, gateway.clone());
        Self {
            gateway,
            agent,
            sessions: SessionStore::new(),
        }
    }
}

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(super::proxy::routes())
        .merge(super::sessions::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
