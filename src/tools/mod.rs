//! The operations the model may invoke, and their function-calling schemas.
//!
//! The registry is a closed enum: every operation maps to one upstream and
//! carries one schema.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::gateway::{GatewayError, Method, RequestDescriptor, Upstream};

/// A callable operation exposed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    CallBrokerage,
    CallMarketData,
}

/// Every registered operation, in the order offered to the model.
pub const ALL_TOOLS: [ToolKind; 2] = [ToolKind::CallBrokerage, ToolKind::CallMarketData];

impl ToolKind {
    /// Wire name, as it appears in tool schemas and tool calls.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::CallBrokerage => "callBrokerage",
            ToolKind::CallMarketData => "callMarketData",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "callBrokerage" => Some(ToolKind::CallBrokerage),
            "callMarketData" => Some(ToolKind::CallMarketData),
            _ => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::CallBrokerage => {
                "Call the brokerage REST API. Use for account state, positions, \
                 and placing or managing orders."
            }
            ToolKind::CallMarketData => {
                "Call the market-data API. Use for quotes, price history, and \
                 other market information."
            }
        }
    }

    pub fn upstream(self) -> Upstream {
        match self {
            ToolKind::CallBrokerage => Upstream::Brokerage,
            ToolKind::CallMarketData => Upstream::MarketData,
        }
    }

    /// OpenAI function-calling schema for this operation.
    pub fn schema(self) -> Value {
        let parameters = match self {
            ToolKind::CallBrokerage => json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "API path, e.g. /v2/account or /v2/orders"
                    },
                    "method": {
                        "type": "string",
                        "enum": ["GET", "POST", "PUT", "DELETE"],
                        "description": "HTTP method, defaults to GET"
                    },
                    "params": {
                        "type": "object",
                        "description": "Query parameters"
                    },
                    "body": {
                        "type": "object",
                        "description": "JSON body for POST/PUT requests"
                    }
                },
                "required": ["path"]
            }),
            ToolKind::CallMarketData => json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "API path, e.g. /quote/AAPL"
                    },
                    "params": {
                        "type": "object",
                        "description": "Query parameters; the API key is supplied automatically"
                    }
                },
                "required": ["path"]
            }),
        };
        json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": self.description(),
                "parameters": parameters,
            }
        })
    }

    /// Decode a tool call's raw argument string into an upstream request.
    /// Market-data calls are always GETs and never carry a body.
    pub fn parse_arguments(self, raw: &str) -> Result<RequestDescriptor, GatewayError> {
        match self {
            ToolKind::CallBrokerage => {
                let args: BrokerageArgs = decode(raw)?;
                Ok(RequestDescriptor {
                    upstream: self.upstream(),
                    path: non_empty_path(args.path)?,
                    method: args.method,
                    params: args.params,
                    body: args.body,
                })
            }
            ToolKind::CallMarketData => {
                let args: MarketDataArgs = decode(raw)?;
                Ok(RequestDescriptor {
                    upstream: self.upstream(),
                    path: non_empty_path(args.path)?,
                    method: Method::Get,
                    params: args.params,
                    body: None,
                })
            }
        }
    }
}

/// The full registry, ready to offer to the model.
pub fn tool_schemas() -> Vec<Value> {
    ALL_TOOLS.iter().map(|tool| tool.schema()).collect()
}

#[derive(Deserialize)]
struct BrokerageArgs {
    path: String,
    #[serde(default)]
    method: Method,
    #[serde(default)]
    params: Map<String, Value>,
    #[serde(default)]
    body: Option<Value>,
}

#[derive(Deserialize)]
struct MarketDataArgs {
    path: String,
    #[serde(default)]
    params: Map<String, Value>,
}

fn decode<'a, T: Deserialize<'a>>(raw: &'a str) -> Result<T, GatewayError> {
    serde_json::from_str(raw).map_err(|e| GatewayError::MalformedToolArguments(e.to_string()))
}

fn non_empty_path(path: String) -> Result<String, GatewayError> {
    if path.is_empty() {
        return Err(GatewayError::MalformedToolArguments(
            "path must not be empty".to_string(),
        ));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn names_round_trip() {
        for tool in ALL_TOOLS {
            assert_eq!(ToolKind::from_name(tool.name()), Some(tool));
        }
        assert_eq!(ToolKind::from_name("teleport"), None);
    }

    #[test]
    fn registry_offers_both_schemas() {
        let schemas = tool_schemas();
        assert_eq!(schemas.len(), 2);
        assert_eq!(schemas[0]["type"], "function");
        assert_eq!(schemas[0]["function"]["name"], "callBrokerage");
        assert_eq!(schemas[1]["function"]["name"], "callMarketData");
        assert_eq!(
            schemas[0]["function"]["parameters"]["required"],
            json!(["path"])
        );
    }

    #[test]
    fn brokerage_arguments_decode_in_full() {
        let raw = r#"{
            "path": "/v2/orders",
            "method": "POST",
            "params": {"nested": "true"},
            "body": {"symbol": "AAPL", "qty": 1}
        }"#;
        let request = ToolKind::CallBrokerage
            .parse_arguments(raw)
            .expect("arguments decode");
        assert_eq!(request.upstream, Upstream::Brokerage);
        assert_eq!(request.path, "/v2/orders");
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.params.get("nested"), Some(&json!("true")));
        assert_eq!(request.body, Some(json!({"symbol": "AAPL", "qty": 1})));
    }

    #[test]
    fn omitted_fields_default_to_a_bare_get() {
        let request = ToolKind::CallBrokerage
            .parse_arguments(r#"{"path": "/v2/account"}"#)
            .expect("arguments decode");
        assert_eq!(request.method, Method::Get);
        assert!(request.params.is_empty());
        assert_eq!(request.body, None);
    }

    #[test]
    fn market_data_calls_are_forced_to_get_without_body() {
        let raw = r#"{"path": "/quote/AAPL", "params": {"serietype": "line"}}"#;
        let request = ToolKind::CallMarketData
            .parse_arguments(raw)
            .expect("arguments decode");
        assert_eq!(request.upstream, Upstream::MarketData);
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.body, None);
    }

    #[test]
    fn undecodable_arguments_are_malformed() {
        let err = ToolKind::CallBrokerage
            .parse_arguments("{not json")
            .expect_err("should not decode");
        assert!(matches!(err, GatewayError::MalformedToolArguments(_)));
        assert!(err.to_string().starts_with("Invalid tool arguments: "));
    }

    #[test]
    fn missing_or_empty_path_is_malformed() {
        let missing = ToolKind::CallBrokerage
            .parse_arguments("{}")
            .expect_err("path is required");
        assert!(matches!(missing, GatewayError::MalformedToolArguments(_)));

        let empty = ToolKind::CallMarketData
            .parse_arguments(r#"{"path": ""}"#)
            .expect_err("empty path is rejected");
        assert_eq!(
            empty.to_string(),
            "Invalid tool arguments: path must not be empty"
        );
    }

    #[test]
    fn unknown_method_verb_is_malformed() {
        let err = ToolKind::CallBrokerage
            .parse_arguments(r#"{"path": "/v2/account", "method": "PATCH"}"#)
            .expect_err("PATCH is not a registered verb");
        assert!(matches!(err, GatewayError::MalformedToolArguments(_)));
    }
}
