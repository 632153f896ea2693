//! Upstream gateway: forwards generic path/params requests to the brokerage
//! or market-data API with credentials injected per call.
//!
//! The gateway never validates or rewrites what it forwards. Paths, query
//! parameters, and bodies pass through verbatim; the only additions are the
//! resolved credentials (headers for the brokerage, an `apikey` query
//! parameter for market data). Every failure is normalized into a
//! [`GatewayError`] value so callers can treat it as data, and no request is
//! ever retried.

mod credentials;

pub use credentials::{
    resolve_brokerage, resolve_market_data, BrokerageCredentials, CredentialOverrides,
};

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Default brokerage (Alpaca paper trading) base URL.
pub const DEFAULT_BROKERAGE_BASE_URL: &str = "https://paper-api.alpaca.markets";
/// Default market-data (Financial Modeling Prep) base URL.
pub const DEFAULT_MARKET_DATA_BASE_URL: &str = "https://financialmodelingprep.com/api/v4";

/// The two upstreams the gateway can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Brokerage,
    MarketData,
}

impl Upstream {
    /// The exact detail message reported when no credentials resolve.
    pub fn missing_credentials_detail(self) -> &'static str {
        match self {
            Upstream::Brokerage => {
                "Missing Alpaca credentials. Provide them via headers or environment variables."
            }
            Upstream::MarketData => "Missing FMP_KEY environment variable.",
        }
    }
}

/// HTTP verb for an upstream request. Only these four are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully described upstream request: which upstream, which path and verb,
/// plus query parameters and an optional JSON body. Credentials are not part
/// of the descriptor; they are resolved at invocation time.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub upstream: Upstream,
    pub path: String,
    pub method: Method,
    pub params: Map<String, Value>,
    pub body: Option<Value>,
}

/// Everything a gateway call can fail with. These are outcomes, not faults:
/// callers fold them into responses or tool results and carry on.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{}", .0.missing_credentials_detail())]
    MissingCredentials(Upstream),
    /// Upstream answered with a non-2xx status; `body` is its response text.
    #[error("HTTP {status}: {body}")]
    UpstreamError { status: u16, body: String },
    /// The request never produced an upstream response (DNS, connect, timeout).
    #[error("Request failed: {0}")]
    NetworkError(String),
    /// Upstream answered 2xx but the body did not decode as JSON.
    #[error("Upstream returned non-JSON response: {0}")]
    MalformedUpstreamResponse(String),
    /// A model-issued tool call carried arguments that do not decode.
    #[error("Invalid tool arguments: {0}")]
    MalformedToolArguments(String),
}

/// Outcome of one gateway invocation: the upstream's JSON on success.
pub type GatewayResult = Result<Value, GatewayError>;

/// Immutable gateway configuration, fixed at construction.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub brokerage_base_url: String,
    pub market_data_base_url: String,
    /// Default brokerage pair, used when a request carries no full override.
    pub brokerage: Option<BrokerageCredentials>,
    /// Default market-data key.
    pub market_data_key: Option<String>,
    /// Upstream request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            brokerage_base_url: DEFAULT_BROKERAGE_BASE_URL.to_string(),
            market_data_base_url: DEFAULT_MARKET_DATA_BASE_URL.to_string(),
            brokerage: None,
            market_data_key: None,
            timeout_secs: 30,
        }
    }
}

/// The gateway itself. Stateless between calls; cheap to clone.
#[derive(Clone)]
pub struct Gateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Forward one request to its upstream. Exactly one HTTP call is issued,
    /// or none at all when credentials do not resolve.
    pub async fn invoke(
        &self,
        request: &RequestDescriptor,
        overrides: &CredentialOverrides,
    ) -> GatewayResult {
        debug!(
            upstream = ?request.upstream,
            method = ?request.method,
            path = %request.path,
            "forwarding upstream request"
        );
        let result = match request.upstream {
            Upstream::Brokerage => self.call_brokerage(request, overrides).await,
            Upstream::MarketData => self.call_market_data(request, overrides).await,
        };
        if let Err(error) = &result {
            warn!(upstream = ?request.upstream, path = %request.path, error = %error, "upstream call failed");
        }
        result
    }

    async fn call_brokerage(
        &self,
        request: &RequestDescriptor,
        overrides: &CredentialOverrides,
    ) -> GatewayResult {
        let creds = resolve_brokerage(overrides, self.config.brokerage.as_ref())
            .ok_or(GatewayError::MissingCredentials(Upstream::Brokerage))?;

        let url = format!("{}{}", self.config.brokerage_base_url, request.path);
        let mut upstream_req = self
            .client
            .request(request.method.as_reqwest(), &url)
            .header("APCA-API-KEY-ID", &creds.key_id)
            .header("APCA-API-SECRET-KEY", &creds.secret)
            .query(&query_pairs(&request.params))
            .timeout(Duration::from_secs(self.config.timeout_secs));
        if let Some(body) = &request.body {
            upstream_req = upstream_req.json(body);
        }

        dispatch(upstream_req).await
    }

    async fn call_market_data(
        &self,
        request: &RequestDescriptor,
        overrides: &CredentialOverrides,
    ) -> GatewayResult {
        let key = resolve_market_data(overrides, self.config.market_data_key.as_deref())
            .ok_or(GatewayError::MissingCredentials(Upstream::MarketData))?;

        let url = format!("{}{}", self.config.market_data_base_url, request.path);
        // The resolved key always wins over any caller-supplied `apikey`.
        let mut pairs = query_pairs(&request.params);
        pairs.retain(|(name, _)| name != "apikey");
        pairs.push(("apikey".to_string(), key));

        let upstream_req = self
            .client
            .request(request.method.as_reqwest(), &url)
            .query(&pairs)
            .timeout(Duration::from_secs(self.config.timeout_secs));

        dispatch(upstream_req).await
    }
}

/// Send the request and normalize the outcome. Non-2xx statuses and
/// undecodable bodies become errors; nothing is retried.
async fn dispatch(upstream_req: reqwest::RequestBuilder) -> GatewayResult {
    let response = upstream_req
        .send()
        .await
        .map_err(|e| GatewayError::NetworkError(e.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| GatewayError::NetworkError(e.to_string()))?;

    if !status.is_success() {
        return Err(GatewayError::UpstreamError {
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_str(&text)
        .map_err(|e| GatewayError::MalformedUpstreamResponse(format!("{}: {}", e, snippet(&text))))
}

/// Query parameters are forwarded verbatim: strings as-is, everything else in
/// its compact JSON rendering.
fn query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(name, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (name.clone(), rendered)
        })
        .collect()
}

/// First part of a body for error messages, cut at a char boundary.
fn snippet(text: &str) -> &str {
    let mut end = text.len().min(200);
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    &text[..end]
}
