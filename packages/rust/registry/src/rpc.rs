//! JSON-RPC 2.0 envelope types for `eth_call` requests.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Outgoing JSON-RPC request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<Value>,
    pub id: u64,
}

impl RpcRequest {
    /// Build an `eth_call` against `to` with the given calldata, evaluated
    /// at the latest block.
    pub fn eth_call(to: &str, calldata: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: "eth_call".to_string(),
            params: vec![json!({ "to": to, "data": calldata }), json!("latest")],
            id: 1,
        }
    }
}

/// Incoming JSON-RPC response: exactly one of `result` / `error` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}
