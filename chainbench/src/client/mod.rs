//! Layer clients: the per-node network surfaces.
//!
//! Dispatch is by layer family, never by probing which methods a client
//! happens to expose:
//!
//! ```text
//! ExecuteLayerClient
//!   └── EvmExecuteClient          alloy HTTP provider, local signing
//! ConsensusLayerClient
//!   ├── CometBftConsensusClient   GET /path?query → { jsonrpc, id, result }
//!   └── CosmosRestClient          GET REST API → body
//! ```
//!
//! One client instance exists per (node, layer) pair and is shared by every
//! call routed to that node.

mod cometbft;
mod config;
mod evm;
mod rest;

use std::fmt;

use alloy::primitives::U256;
use async_trait::async_trait;
use serde_json::Value;

pub use cometbft::CometBftConsensusClient;
pub(crate) use config::{endpoint, parse_url, with_port};
pub use config::{
    DEFAULT_COMETBFT_RPC_PORT, DEFAULT_COSMOS_REST_PORT, DEFAULT_EVM_RPC_PORT, HttpClientConfig,
};
pub use evm::EvmExecuteClient;
pub use rest::CosmosRestClient;

use crate::error::{Error, Result};
use crate::types::{ChainType, FeeData, Layer, TransactionReceipt, TransactionRequest, TransactionResult};
use crate::wallet::Wallet;

/// Execution-layer JSON-RPC surface of one endpoint.
#[async_trait]
pub trait ExecuteLayerClient: Send + Sync + fmt::Debug {
    /// Execution family served by this client.
    fn chain_type(&self) -> ChainType;

    /// Endpoint URL.
    fn rpc_url(&self) -> &str;

    /// Lightweight liveness probe.
    async fn test_connection(&self) -> Result<bool>;

    /// Latest block number.
    async fn block_number(&self) -> Result<u64>;

    /// Chain id reported by the endpoint.
    async fn chain_id(&self) -> Result<u64>;

    /// Transaction count of `address`, including the pool when `pending`.
    async fn transaction_count(&self, address: &str, pending: bool) -> Result<u64>;

    /// Native balance of `address` in base units.
    async fn balance(&self, address: &str) -> Result<U256>;

    /// Current fee parameters.
    async fn fee_data(&self) -> Result<FeeData>;

    /// Sign `request` with `wallet` and submit it. Returns the pending result.
    async fn send_transaction(
        &self,
        request: &TransactionRequest,
        wallet: &Wallet,
    ) -> Result<TransactionResult>;

    /// Receipt of `hash`, `None` while not yet mined.
    async fn transaction_receipt(&self, hash: &str) -> Result<Option<TransactionReceipt>>;

    /// Generic JSON-RPC call.
    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value>;
}

/// Consensus-layer surface (CometBFT RPC or Cosmos REST) of one endpoint.
#[async_trait]
pub trait ConsensusLayerClient: Send + Sync + fmt::Debug {
    /// [`Layer::Consensus`] for RPC clients, [`Layer::Rest`] for REST clients.
    fn layer(&self) -> Layer;

    /// Endpoint URL.
    fn rpc_url(&self) -> &str;

    /// Lightweight liveness probe.
    async fn test_connection(&self) -> Result<bool>;

    /// Latest committed height.
    async fn block_height(&self) -> Result<u64>;

    /// GET `path` with query `params`, returning the unwrapped payload.
    async fn rpc_call(&self, path: &str, params: &[(String, String)]) -> Result<Value>;
}

/// Heights arrive as decimal strings from CometBFT and as numbers elsewhere.
pub(crate) fn parse_height(value: &Value, what: &str) -> Result<u64> {
    match value {
        Value::String(s) => s
            .parse()
            .map_err(|e| Error::unavailable(format!("malformed {what} '{s}': {e}"))),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| Error::unavailable(format!("malformed {what} {n}"))),
        _ => Err(Error::unavailable(format!("missing {what} in response"))),
    }
}

/// Convert a JSON-RPC style `error` object into [`Error::Rpc`].
pub(crate) fn rpc_error(error: &Value) -> Error {
    let code = error.get("code").and_then(Value::as_i64).unwrap_or(-1);
    let mut message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_owned();
    if let Some(data) = error.get("data").and_then(Value::as_str) {
        message.push_str(": ");
        message.push_str(data);
    }
    Error::Rpc { code, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_height_variants() {
        assert_eq!(parse_height(&json!("42"), "height").unwrap(), 42);
        assert_eq!(parse_height(&json!(7), "height").unwrap(), 7);
        assert!(parse_height(&json!("x"), "height").is_err());
        assert!(parse_height(&Value::Null, "height").is_err());
    }

    #[test]
    fn test_rpc_error_includes_data() {
        let err = rpc_error(&json!({
            "code": -32603,
            "message": "Internal error",
            "data": "height 100 must be less than or equal to the current blockchain height 5"
        }));
        let Error::Rpc { code, message } = err else {
            panic!("expected Rpc error");
        };
        assert_eq!(code, -32603);
        assert!(message.starts_with("Internal error: height 100"));
    }
}
