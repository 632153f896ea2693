//! API request and response types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::gateway::Method;

/// Body of `POST /callBrokerage`.
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerageCallRequest {
    /// Brokerage API path, e.g. `/v2/account` or `/v2/orders`
    pub path: String,

    /// HTTP method (defaults to GET)
    #[serde(default)]
    pub method: Method,

    /// Query parameters, forwarded verbatim
    #[serde(default)]
    pub params: Map<String, Value>,

    /// Optional JSON body for POST/PUT requests
    #[serde(default)]
    pub body: Option<Value>,
}

/// Body of `POST /callMarketData`. Market-data requests are always GETs.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketDataCallRequest {
    /// Market-data API path, e.g. `/quote/AAPL`
    pub path: String,

    /// Query parameters; the resolved API key is appended automatically
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Request to open a new session. Absent fields take the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Capital available to the session
    pub capital: Option<f64>,

    /// Daily profit target
    pub profit_target: Option<f64>,
}

/// Response after opening a session.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    /// Unique session identifier
    pub id: Uuid,

    /// The assistant's opening greeting
    pub greeting: String,
}

/// Request to send one user message to a session.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// The assistant's reply for one round.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResponse {
    pub reply: String,
}

/// Error envelope shared by every failure this API reports.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,

    /// Service version
    pub version: &'static str,
}
