//! Gateway endpoints.
//!
//! Receives `POST /callBrokerage` and `POST /callMarketData` requests,
//! resolves credentials (header overrides for the brokerage, configured
//! defaults otherwise), and forwards the described call upstream. Gateway
//! failures come back as `200 {"error": …}` payloads: to the caller they are
//! data, not transport faults. Only an undecodable request body is a 400.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use crate::gateway::{CredentialOverrides, GatewayResult, Method, RequestDescriptor, Upstream};

use super::types::{BrokerageCallRequest, MarketDataCallRequest};

pub fn routes() -> Router<Arc<super::routes::AppState>> {
    Router::new()
        .route("/callBrokerage", post(call_brokerage))
        .route("/callMarketData", post(call_market_data))
}

/// Extract the brokerage override pair from the inbound headers.
fn overrides_from_headers(headers: &HeaderMap) -> CredentialOverrides {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    CredentialOverrides {
        brokerage_key_id: header("apca-api-key-id"),
        brokerage_secret: header("apca-api-secret-key"),
        market_data_key: None,
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

/// Gateway outcomes always map to 200; failures ride along as data.
fn gateway_response(result: GatewayResult) -> Response {
    match result {
        Ok(value) => Json(value).into_response(),
        Err(error) => Json(json!({ "error": error.to_string() })).into_response(),
    }
}

async fn call_brokerage(
    State(state): State<Arc<super::routes::AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let req: BrokerageCallRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => return bad_request(format!("Invalid request body: {}", e)),
    };
    if req.path.is_empty() {
        return bad_request("path must not be empty".to_string());
    }

    let request = RequestDescriptor {
        upstream: Upstream::Brokerage,
        path: req.path,
        method: req.method,
        params: req.params,
        body: req.body,
    };
    let overrides = overrides_from_headers(&headers);
    gateway_response(state.gateway.invoke(&request, &overrides).await)
}

async fn call_market_data(
    State(state): State<Arc<super::routes::AppState>>,
    body: Bytes,
) -> Response {
    let req: MarketDataCallRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => return bad_request(format!("Invalid request body: {}", e)),
    };
    if req.path.is_empty() {
        return bad_request("path must not be empty".to_string());
    }

    let request = RequestDescriptor {
        upstream: Upstream::MarketData,
        path: req.path,
        method: Method::Get,
        params: req.params,
        body: None,
    };
    gateway_response(
        state
            .gateway
            .invoke(&request, &CredentialOverrides::default())
            .await,
    )
}
