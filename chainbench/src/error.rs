//! Unified error types for chainbench.
//!
//! Single-entity operations (sending one transaction, reading one node's
//! height) return these errors directly. Batch operations capture them per
//! item instead, see [`crate::blockchain`].

use std::time::Duration;

use crate::types::Layer;

// ============================================================================
// Main Error Type
// ============================================================================

/// The main error type for chainbench operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Network configuration is missing required fields or is inconsistent.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Required fields that were absent.
        missing: Vec<String>,
        /// Human-readable description.
        reason: String,
    },

    /// The chain type string is not one of the supported families.
    #[error("unsupported chain type: {0}")]
    UnsupportedChainType(String),

    /// The consensus engine string is not one of the supported engines.
    #[error("unsupported consensus layer: {0}")]
    UnsupportedConsensusLayer(String),

    /// No node carries the requested index.
    #[error("node {0} not found")]
    NodeNotFound(u32),

    /// Default selection found no active, non-boot node.
    #[error("no active non-boot nodes available")]
    NoActiveNodes,

    /// The node has no client for the requested layer.
    #[error("node {node} has no {layer} client configured")]
    NoClientConfigured {
        /// Node index.
        node: u32,
        /// Layer that was requested.
        layer: Layer,
    },

    /// The node has neither an execution nor a consensus client.
    #[error("node {0} has no layer clients configured")]
    NoLayerClients(u32),

    /// The operation is not available on the node's chain type.
    #[error("{operation} is not supported by node {node}")]
    UnsupportedForLayer {
        /// Node index (or the public endpoint marker).
        node: u32,
        /// Operation that was attempted.
        operation: String,
    },

    /// No public endpoint client exists for the layer.
    #[error("no public {0} endpoint configured")]
    PublicEndpointNotConfigured(Layer),

    /// A founder-funded operation ran without a source wallet.
    #[error("no founder wallet configured")]
    NoFounderWallet,

    /// The port for the layer was explicitly disabled for the node.
    #[error("node {node} has no {layer} port configured")]
    PortNotConfigured {
        /// Node index.
        node: u32,
        /// Layer whose port is disabled.
        layer: Layer,
    },

    /// Transport or RPC failure talking to a node.
    #[error("rpc unavailable: {0}")]
    RpcUnavailable(String),

    /// The remote returned a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// JSON-RPC error message.
        message: String,
    },

    /// A bounded wait expired.
    #[error("{operation} timed out after {}ms", after.as_millis())]
    Timeout {
        /// What was being waited for.
        operation: String,
        /// The bound that elapsed.
        after: Duration,
    },

    /// One transaction of a multi-send failed; the whole call is aborted.
    #[error("transaction {index} of batch failed: {source}")]
    BatchSend {
        /// Zero-based position in the input batch.
        index: usize,
        /// Underlying failure.
        #[source]
        source: Box<Self>,
    },

    /// A response did not satisfy its schema.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Wallet construction or signing error.
    #[error("wallet: {0}")]
    Wallet(#[from] WalletError),

    /// Transaction could not be built or decoded.
    #[error("transaction: {0}")]
    Transaction(String),

    /// HTTP client error.
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid configuration error listing missing fields.
    #[must_use]
    pub fn missing_fields(missing: Vec<String>) -> Self {
        let reason = format!("missing required fields: {}", missing.join(", "));
        Self::InvalidConfiguration { missing, reason }
    }

    /// Create an invalid configuration error without missing fields.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            missing: Vec::new(),
            reason: reason.into(),
        }
    }

    /// Create an rpc unavailable error.
    #[inline]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::RpcUnavailable(msg.into())
    }

    /// Create a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            after,
        }
    }

    /// Create an unsupported-for-layer error.
    #[inline]
    pub fn unsupported(node: u32, operation: impl Into<String>) -> Self {
        Self::UnsupportedForLayer {
            node,
            operation: operation.into(),
        }
    }

    /// Whether this error means "nothing to probe" rather than "probe failed".
    #[must_use]
    pub const fn is_no_client(&self) -> bool {
        matches!(self, Self::NoClientConfigured { .. } | Self::NoLayerClients(_))
    }

    /// Whether this error is a bounded wait expiring.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type alias for chainbench operations.
pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// Wallet Errors
// ============================================================================

/// Error type for wallet construction and signing.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// Wallet configuration is incomplete or malformed.
    #[error("config: {0}")]
    Config(String),

    /// HD key derivation failed.
    #[error("derivation: {0}")]
    Derivation(String),

    /// Signing failed.
    #[error("signing: {0}")]
    Signing(String),

    /// The wallet is address-only and cannot sign.
    #[error("wallet {0} has no private key")]
    MissingKey(String),
}

impl WalletError {
    /// Create a config error.
    #[inline]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

// ============================================================================
// Tests
// ============================================================================
