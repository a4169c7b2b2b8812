//! Shared value types: chain families, node roles, transaction and RPC envelopes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

// ============================================================================
// Chain / Layer Identity
// ============================================================================

/// Execution-layer family of a chain. Also used as the wallet family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum ChainType {
    /// EVM-compatible execution layer (JSON-RPC, secp256k1 / keccak addresses).
    Evm,
    /// Cosmos SDK execution (bech32 addresses).
    Cosmos,
}

impl ChainType {
    /// Canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Evm => "EVM",
            Self::Cosmos => "COSMOS",
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "evm" | "ethereum" => Ok(Self::Evm),
            "cosmos" => Ok(Self::Cosmos),
            _ => Err(Error::UnsupportedChainType(s.to_owned())),
        }
    }
}

impl TryFrom<String> for ChainType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Consensus-layer family of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum ConsensusLayer {
    /// CometBFT RPC.
    CometBft,
    /// Tendermint RPC (wire compatible with CometBFT).
    Tendermint,
}

impl fmt::Display for ConsensusLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CometBft => "COMETBFT",
            Self::Tendermint => "TENDERMINT",
        })
    }
}

impl FromStr for ConsensusLayer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cometbft" | "comet" => Ok(Self::CometBft),
            "tendermint" => Ok(Self::Tendermint),
            _ => Err(Error::UnsupportedConsensusLayer(s.to_owned())),
        }
    }
}

impl TryFrom<String> for ConsensusLayer {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which client surface of a node an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Execution layer JSON-RPC.
    Execute,
    /// Consensus layer RPC.
    Consensus,
    /// Consensus layer REST API.
    Rest,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Execute => "execute layer",
            Self::Consensus => "consensus layer",
            Self::Rest => "rest api",
        })
    }
}

/// Role of a node in the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum NodeType {
    /// Block-producing validator.
    #[default]
    Validator,
    /// Non-validating full node serving RPC.
    FullNode,
    /// Peer-discovery node; never chosen for default routing.
    Bootnode,
    /// Sentry node shielding validators.
    Sentry,
}

impl NodeType {
    /// Canonical name as it appears in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validator => "VALIDATOR",
            Self::FullNode => "FULL_NODE",
            Self::Bootnode => "BOOTNODE",
            Self::Sentry => "SENTRY",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "validator" => Ok(Self::Validator),
            "fullnode" | "full" => Ok(Self::FullNode),
            "bootnode" | "boot" => Ok(Self::Bootnode),
            "sentry" => Ok(Self::Sentry),
            _ => Err(Error::invalid_config(format!("unknown node type '{s}'"))),
        }
    }
}

impl TryFrom<String> for NodeType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ============================================================================
// Transactions
// ============================================================================

/// A caller-constructed transaction request.
///
/// `amount` is a decimal string in the chain's base unit (wei for EVM).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Recipient address.
    pub to: String,
    /// Decimal amount in base units.
    pub amount: String,
    /// Gas limit; estimated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    /// Legacy gas price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u128>,
    /// EIP-1559 fee cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 priority fee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<u128>,
    /// Explicit nonce; the pending count is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    /// Hex-encoded calldata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Free-form memo (Cosmos only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl TransactionRequest {
    /// Create a plain value transfer.
    #[must_use]
    pub fn transfer(to: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            amount: amount.into(),
            ..Self::default()
        }
    }

    /// Set the gas limit.
    #[must_use]
    pub const fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Set calldata.
    #[must_use]
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set an explicit nonce.
    #[must_use]
    pub const fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Apply fee data, replacing whatever fee fields the request carried.
    ///
    /// EIP-1559 fields win over legacy gas price when both are available.
    /// `priority_override` replaces only the priority-fee component.
    #[must_use]
    pub fn with_fees(mut self, fees: &FeeData, priority_override: Option<u128>) -> Self {
        if let Some(max_fee) = fees.max_fee_per_gas {
            let priority = priority_override
                .or(fees.max_priority_fee_per_gas)
                .unwrap_or_default();
            self.max_fee_per_gas = Some(max_fee.max(priority));
            self.max_priority_fee_per_gas = Some(priority);
            self.gas_price = None;
        } else if let Some(gas_price) = fees.gas_price {
            self.gas_price = Some(gas_price);
            self.max_fee_per_gas = None;
            self.max_priority_fee_per_gas = None;
        }
        self
    }
}

/// Inclusion status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Submitted, not yet observed in a block.
    Pending,
    /// Included and successful.
    Confirmed,
    /// Included and reverted, or rejected.
    Failed,
}

/// Result of a submission or of a confirmation.
///
/// Never mutated after it is returned; confirming a pending transaction yields
/// a fresh record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    /// Transaction hash, `0x`-prefixed.
    pub hash: String,
    /// Inclusion status.
    pub status: TxStatus,
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Nonce the transaction was signed with.
    pub nonce: Option<u64>,
    /// Block number once included.
    pub block_number: Option<u64>,
    /// Block hash once included.
    pub block_hash: Option<String>,
    /// Gas used once included.
    pub gas_used: Option<u64>,
}

impl TransactionResult {
    /// Build the confirmed counterpart of this record from a receipt.
    #[must_use]
    pub fn confirmed_by(&self, receipt: &TransactionReceipt) -> Self {
        Self {
            status: if receipt.success {
                TxStatus::Confirmed
            } else {
                TxStatus::Failed
            },
            block_number: Some(receipt.block_number),
            block_hash: receipt.block_hash.clone(),
            gas_used: Some(receipt.gas_used),
            ..self.clone()
        }
    }
}

/// A mined transaction receipt, reduced to what orchestration needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Transaction hash.
    pub hash: String,
    /// Including block.
    pub block_number: u64,
    /// Including block hash.
    pub block_hash: Option<String>,
    /// Gas used.
    pub gas_used: u64,
    /// Execution success flag.
    pub success: bool,
}

/// Fee parameters fetched once per batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeData {
    /// Legacy gas price.
    pub gas_price: Option<u128>,
    /// EIP-1559 fee cap.
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 priority fee.
    pub max_priority_fee_per_gas: Option<u128>,
}

// ============================================================================
// RPC Envelopes
// ============================================================================

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Always `"2.0"`.
    pub jsonrpc: String,
    /// Method name.
    pub method: String,
    /// Positional or named params.
    pub params: Value,
    /// Request id.
    pub id: u64,
}

impl RpcRequest {
    /// Create a request with id 1.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: 1,
        }
    }

    /// Envelope for a consensus-layer path call, used only for validation.
    #[must_use]
    pub fn consensus(path: &str, params: &[(String, String)]) -> Self {
        let params = params
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<serde_json::Map<_, _>>();
        Self::new(path.trim_start_matches('/'), Value::Object(params))
    }
}

/// Request/response schemas handed through to an [`crate::RpcValidator`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcSchemas {
    /// Schema for the request envelope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,
    /// Schema for the response payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

// ============================================================================
// Health
// ============================================================================

/// Per-layer connectivity of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connectivity {
    /// Execution layer answered.
    pub execute_layer_connected: bool,
    /// Consensus layer answered.
    pub consensus_layer_connected: bool,
}

/// One node's entry in a health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeHealth {
    /// Node index.
    pub index: u32,
    /// Node role.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Activation flag at check time.
    pub active: bool,
    /// Whether the liveness probe succeeded.
    pub connected: bool,
    /// Failure message when not connected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
