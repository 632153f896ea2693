//! HTTP API module.
//!
//! Exposes the gateway boundary (`/callBrokerage`, `/callMarketData`) and
//! the session surface (`/sessions`, `/sessions/{id}/messages`).

mod proxy;
mod routes;
mod sessions;
pub mod types;

pub use routes::{build_router, AppState};
pub use sessions::SessionStore;

use std::sync::Arc;

use crate::config::Config;

/// Bind and serve the API until the process exits.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::from_config(&config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
