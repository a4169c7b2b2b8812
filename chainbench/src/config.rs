//! Network configuration documents.
//!
//! A network is described by a JSON document with camelCase keys:
//!
//! ```json
//! {
//!   "chainId": 9000,
//!   "executeLayer": "EVM",
//!   "consensusLayer": "COMETBFT",
//!   "executeLayerHttpRpcUrl": "https://rpc.example.org",
//!   "consensusLayerRpcUrl": "https://comet.example.org",
//!   "founderWallet": { "privateKey": "0x..." },
//!   "nodes": [
//!     { "index": 0, "type": "VALIDATOR", "url": "http://10.0.0.1", "votingPower": 10 },
//!     { "index": 1, "type": "BOOTNODE", "url": "http://10.0.0.2", "executeLayerPort": null }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::client::HttpClientConfig;
use crate::error::{Error, Result};
use crate::types::{ChainType, ConsensusLayer, NodeType};

/// Chain identifier: numeric for EVM chains, a string for Cosmos chains.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainId {
    /// EIP-155 chain id.
    Numeric(u64),
    /// Cosmos chain id, e.g. `cosmoshub-4`.
    Named(String),
}

impl ChainId {
    /// Numeric value, parsing named ids that are plain integers.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Numeric(id) => Some(*id),
            Self::Named(name) => name.parse().ok(),
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Per-layer port configuration of a node.
///
/// An absent key means the chain type's default port, an explicit `null`
/// disables the layer for that node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PortSetting {
    /// Use the layer's default port.
    #[default]
    Default,
    /// Layer disabled for this node.
    Disabled,
    /// Explicit port.
    Port(u16),
}

impl PortSetting {
    /// Whether this is the default setting.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// Resolve against a default port. `None` when disabled.
    #[must_use]
    pub const fn resolve(self, default: u16) -> Option<u16> {
        match self {
            Self::Default => Some(default),
            Self::Disabled => None,
            Self::Port(port) => Some(port),
        }
    }
}

impl<'de> Deserialize<'de> for PortSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Option::<u16>::deserialize(deserializer)?.map_or(Self::Disabled, Self::Port))
    }
}

impl Serialize for PortSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Port(port) => serializer.serialize_u16(*port),
            Self::Default | Self::Disabled => serializer.serialize_none(),
        }
    }
}

/// Wallet material in configuration.
///
/// Precedence when several are set: `privateKey`, then `mnemonic`, then
/// `address` (watch-only).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConfig {
    /// Hex private key, with or without `0x`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// BIP39 mnemonic (EVM only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    /// BIP39 passphrase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
    /// HD derivation index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    /// Address for watch-only wallets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Bech32 prefix for Cosmos wallets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl WalletConfig {
    /// Config holding only a private key.
    #[must_use]
    pub fn from_private_key(key: impl Into<String>) -> Self {
        Self {
            private_key: Some(key.into()),
            ..Self::default()
        }
    }
}

impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("mnemonic", &self.mnemonic.as_ref().map(|_| "<redacted>"))
            .field("index", &self.index)
            .field("address", &self.address)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

const fn default_active() -> bool {
    true
}

/// One node entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    /// Stable identity of the node.
    pub index: u32,
    /// Node role.
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    /// Base URL (scheme + host); ports are applied per layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Legacy spelling of `url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    /// Full execution-layer URL, overriding `url` + port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute_layer_url: Option<String>,
    /// Full consensus-layer URL, overriding `url` + port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus_layer_url: Option<String>,
    /// Whether the node starts active.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Execution-layer port.
    #[serde(default, skip_serializing_if = "PortSetting::is_default")]
    pub execute_layer_port: PortSetting,
    /// Consensus-layer RPC port.
    #[serde(default, skip_serializing_if = "PortSetting::is_default")]
    pub consensus_layer_port: PortSetting,
    /// Consensus weight, used for quorum scenarios.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_power: Option<u64>,
}

impl NodeConfig {
    /// A node of the given role at `url` with default ports.
    #[must_use]
    pub fn new(index: u32, node_type: NodeType, url: impl Into<String>) -> Self {
        Self {
            index,
            node_type,
            url: Some(url.into()),
            rpc_url: None,
            execute_layer_url: None,
            consensus_layer_url: None,
            active: true,
            execute_layer_port: PortSetting::Default,
            consensus_layer_port: PortSetting::Default,
            voting_power: None,
        }
    }

    /// Base URL, falling back to the legacy `rpcUrl` field.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .or(self.rpc_url.as_deref())
            .filter(|u| !u.is_empty())
    }
}

/// A whole network: chain identity, public endpoints, nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Display name; the `name` argument at construction wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Chain id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<ChainId>,
    /// Execution layer family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute_layer: Option<ChainType>,
    /// Consensus layer family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus_layer: Option<ConsensusLayer>,
    /// Wallet family; defaults to `executeLayer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_type: Option<ChainType>,
    /// Public (load-balanced) execution JSON-RPC endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute_layer_http_rpc_url: Option<String>,
    /// Public consensus RPC endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus_layer_rpc_url: Option<String>,
    /// Public consensus REST endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus_layer_http_rest_api_url: Option<String>,
    /// Default operation timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Funding source for scenarios.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founder_wallet: Option<WalletConfig>,
    /// HTTP client settings for consensus-layer clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpClientConfig>,
    /// Nodes in configuration order.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

impl NetworkConfig {
    /// Parse a configuration document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        check_layer_families(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Names of required fields that are absent or empty.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.chain_id.is_none() {
            missing.push("chainId".to_owned());
        }
        if self.execute_layer.is_none() {
            missing.push("executeLayer".to_owned());
        }
        if self.consensus_layer.is_none() {
            missing.push("consensusLayer".to_owned());
        }
        if self
            .execute_layer_http_rpc_url
            .as_deref()
            .is_none_or(str::is_empty)
        {
            missing.push("executeLayerHttpRpcUrl".to_owned());
        }
        missing
    }

    /// Check required fields and node index uniqueness.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(Error::missing_fields(missing));
        }

        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.index) {
                return Err(Error::invalid_config(format!(
                    "duplicate node index {}",
                    node.index
                )));
            }
        }
        Ok(())
    }
}

/// Reject unknown layer families with their own error kinds rather than as
/// a generic deserialization failure.
fn check_layer_families(value: &Value) -> Result<()> {
    for key in ["executeLayer", "chainType"] {
        if let Some(family) = value.get(key).and_then(Value::as_str) {
            family.parse::<ChainType>()?;
        }
    }
    if let Some(engine) = value.get("consensusLayer").and_then(Value::as_str) {
        engine.parse::<ConsensusLayer>()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETWORK: &str = r#"{
        "chainId": 9000,
        "executeLayer": "EVM",
        "consensusLayer": "cometbft",
        "executeLayerHttpRpcUrl": "https://rpc.example.org",
        "timeout": 30000,
        "founderWallet": { "privateKey": "0x01" },
        "nodes": [
            { "index": 0, "type": "VALIDATOR", "url": "http://10.0.0.1", "votingPower": 10 },
            { "index": 1, "type": "BOOTNODE", "rpcUrl": "http://10.0.0.2", "executeLayerPort": null, "active": false },
            { "index": 2, "type": "FULL_NODE", "url": "http://10.0.0.3", "consensusLayerPort": 36657 }
        ]
    }"#;

    #[test]
    fn test_parse_network() {
        let config = NetworkConfig::from_json(NETWORK).unwrap();
        assert_eq!(config.chain_id, Some(ChainId::Numeric(9000)));
        assert_eq!(config.execute_layer, Some(ChainType::Evm));
        assert_eq!(config.consensus_layer, Some(ConsensusLayer::CometBft));
        assert_eq!(config.nodes.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_port_settings() {
        let config = NetworkConfig::from_json(NETWORK).unwrap();
        assert_eq!(config.nodes[0].execute_layer_port, PortSetting::Default);
        assert_eq!(config.nodes[1].execute_layer_port, PortSetting::Disabled);
        assert_eq!(config.nodes[2].consensus_layer_port, PortSetting::Port(36657));
        assert_eq!(PortSetting::Disabled.resolve(8545), None);
        assert_eq!(PortSetting::Default.resolve(8545), Some(8545));
    }

    #[test]
    fn test_node_defaults_and_legacy_url() {
        let config = NetworkConfig::from_json(NETWORK).unwrap();
        assert!(config.nodes[0].active);
        assert!(!config.nodes[1].active);
        assert_eq!(config.nodes[1].base_url(), Some("http://10.0.0.2"));
        assert_eq!(config.nodes[1].node_type, NodeType::Bootnode);
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let config = NetworkConfig::from_json(r#"{ "chainId": "test-1" }"#).unwrap();
        let err = config.validate().unwrap_err();
        let Error::InvalidConfiguration { missing, .. } = err else {
            panic!("expected InvalidConfiguration");
        };
        assert_eq!(
            missing,
            vec!["executeLayer", "consensusLayer", "executeLayerHttpRpcUrl"]
        );
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let mut config = NetworkConfig::from_json(NETWORK).unwrap();
        config.nodes[2].index = 0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_unsupported_execute_layer_fails_to_parse() {
        let err = NetworkConfig::from_json(r#"{ "executeLayer": "SOLANA" }"#).unwrap_err();
        assert!(matches!(err, Error::UnsupportedChainType(ref s) if s == "SOLANA"));

        let err = NetworkConfig::from_json(r#"{ "consensusLayer": "narwhal" }"#).unwrap_err();
        assert!(matches!(err, Error::UnsupportedConsensusLayer(ref s) if s == "narwhal"));
    }

    #[test]
    fn test_wallet_config_debug_redacts() {
        let wallet = WalletConfig::from_private_key("0xdeadbeef");
        let debug = format!("{wallet:?}");
        assert!(!debug.contains("deadbeef"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.json");
        std::fs::write(&path, NETWORK).unwrap();
        let config = NetworkConfig::from_file(&path).unwrap();
        assert_eq!(config.nodes[2].index, 2);

        let missing = NetworkConfig::from_file(dir.path().join("absent.json"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
