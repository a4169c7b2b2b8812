//! A single network participant and its layer clients.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::client::{
    CometBftConsensusClient, ConsensusLayerClient, DEFAULT_COMETBFT_RPC_PORT,
    DEFAULT_COSMOS_REST_PORT, DEFAULT_EVM_RPC_PORT, EvmExecuteClient, ExecuteLayerClient,
    HttpClientConfig, with_port,
};
use crate::config::{NodeConfig, PortSetting};
use crate::error::{Error, Result};
use crate::types::{ChainType, Connectivity, Layer, NodeType, TransactionRequest, TransactionResult};
use crate::wallet::{Wallet, WalletFactory};

/// Probe bound used by [`BlockchainNode::test_connection`] when none is given.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// One validator, full node, sentry or bootnode.
///
/// Owns at most one execution-layer client and at most one consensus-layer
/// client. The activation flag changes only through the owning
/// [`crate::Blockchain`]; failed probes never deactivate a node.
#[derive(Debug)]
pub struct BlockchainNode {
    index: u32,
    node_type: NodeType,
    active: bool,
    chain_type: ChainType,
    url: Option<String>,
    execute_layer_url: Option<String>,
    consensus_layer_url: Option<String>,
    execute_layer_port: PortSetting,
    consensus_layer_port: PortSetting,
    voting_power: Option<u64>,
    execute: Option<Arc<dyn ExecuteLayerClient>>,
    consensus: Option<Arc<dyn ConsensusLayerClient>>,
}

impl BlockchainNode {
    /// Create a builder for a node with injected clients.
    #[must_use]
    pub fn builder(index: u32, node_type: NodeType) -> BlockchainNodeBuilder {
        BlockchainNodeBuilder::new(index, node_type)
    }

    /// Build a node and its clients from configuration.
    ///
    /// The execution client is an [`EvmExecuteClient`] on EVM chains; the
    /// consensus client is a [`CometBftConsensusClient`]. A layer whose port is
    /// disabled, or a node without any URL, gets no client for that layer.
    pub fn from_config(
        config: &NodeConfig,
        chain_type: ChainType,
        http: &HttpClientConfig,
    ) -> Result<Self> {
        let mut node = Self::builder(config.index, config.node_type)
            .chain_type(chain_type)
            .active(config.active)
            .execute_layer_port(config.execute_layer_port)
            .consensus_layer_port(config.consensus_layer_port)
            .build();
        node.url = config.base_url().map(str::to_owned);
        node.execute_layer_url.clone_from(&config.execute_layer_url);
        node.consensus_layer_url.clone_from(&config.consensus_layer_url);
        node.voting_power = config.voting_power;

        if chain_type == ChainType::Evm && node.has_endpoint(Layer::Execute) {
            let client = EvmExecuteClient::connect(&node.execute_layer_rpc_url()?, http)?;
            node.execute = Some(Arc::new(client));
        }
        if node.has_endpoint(Layer::Consensus) {
            let client = CometBftConsensusClient::connect(&node.consensus_layer_rpc_url()?, http)?;
            node.consensus = Some(Arc::new(client));
        }

        debug!(
            node = node.index,
            node_type = %node.node_type,
            execute = node.execute.is_some(),
            consensus = node.consensus.is_some(),
            "node configured",
        );
        Ok(node)
    }

    /// Stable identity.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Role.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Whether the node participates in selection.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the node is a bootnode.
    #[must_use]
    pub const fn is_bootnode(&self) -> bool {
        matches!(self.node_type, NodeType::Bootnode)
    }

    /// Chain family the node serves.
    #[must_use]
    pub const fn chain_type(&self) -> ChainType {
        self.chain_type
    }

    /// Base URL.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Consensus weight.
    #[must_use]
    pub const fn voting_power(&self) -> Option<u64> {
        self.voting_power
    }

    pub(crate) const fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Execution-layer client, or [`Error::NoClientConfigured`].
    pub fn execute_client(&self) -> Result<&Arc<dyn ExecuteLayerClient>> {
        self.execute.as_ref().ok_or(Error::NoClientConfigured {
            node: self.index,
            layer: Layer::Execute,
        })
    }

    /// Consensus-layer client, or [`Error::NoClientConfigured`].
    pub fn consensus_client(&self) -> Result<&Arc<dyn ConsensusLayerClient>> {
        self.consensus.as_ref().ok_or(Error::NoClientConfigured {
            node: self.index,
            layer: Layer::Consensus,
        })
    }

    fn has_endpoint(&self, layer: Layer) -> bool {
        let (port, explicit) = match layer {
            Layer::Execute => (self.execute_layer_port, &self.execute_layer_url),
            Layer::Consensus | Layer::Rest => (self.consensus_layer_port, &self.consensus_layer_url),
        };
        port != PortSetting::Disabled && (explicit.is_some() || self.url.is_some())
    }

    fn layer_rpc_url(&self, layer: Layer) -> Result<String> {
        let (port, explicit, default) = match layer {
            Layer::Execute => (
                self.execute_layer_port,
                &self.execute_layer_url,
                match self.chain_type {
                    ChainType::Evm => DEFAULT_EVM_RPC_PORT,
                    ChainType::Cosmos => DEFAULT_COSMOS_REST_PORT,
                },
            ),
            Layer::Consensus | Layer::Rest => (
                self.consensus_layer_port,
                &self.consensus_layer_url,
                DEFAULT_COMETBFT_RPC_PORT,
            ),
        };
        let Some(port) = port.resolve(default) else {
            return Err(Error::PortNotConfigured {
                node: self.index,
                layer,
            });
        };
        if let Some(url) = explicit {
            return Ok(url.clone());
        }
        let base = self
            .url
            .as_deref()
            .ok_or_else(|| Error::invalid_config(format!("node {} has no url", self.index)))?;
        with_port(base, port)
    }

    /// Execution-layer endpoint derived from `url` and the layer port.
    pub fn execute_layer_rpc_url(&self) -> Result<String> {
        self.layer_rpc_url(Layer::Execute)
    }

    /// Consensus-layer endpoint derived from `url` and the layer port.
    pub fn consensus_layer_rpc_url(&self) -> Result<String> {
        self.layer_rpc_url(Layer::Consensus)
    }

    /// Probe every configured layer within `timeout`.
    ///
    /// Returns `false` on any failure. Fails with
    /// [`Error::NoLayerClients`] only when the node has no client at all.
    pub async fn test_connection(&self, timeout: Option<Duration>) -> Result<bool> {
        match self.probe(timeout).await {
            Ok(()) => Ok(true),
            Err(err) if err.is_no_client() => Err(err),
            Err(err) => {
                debug!(node = self.index, error = %err, "connection probe failed");
                Ok(false)
            }
        }
    }

    /// Like [`Self::test_connection`], but keeps the cause of a failed probe.
    pub(crate) async fn probe(&self, timeout: Option<Duration>) -> Result<()> {
        if self.execute.is_none() && self.consensus.is_none() {
            return Err(Error::NoLayerClients(self.index));
        }
        let timeout = timeout.unwrap_or(DEFAULT_PROBE_TIMEOUT);

        let probe = async {
            if let Some(client) = &self.execute {
                if !client.test_connection().await? {
                    return Err(Error::unavailable(format!("{}: not listening", client.rpc_url())));
                }
            }
            if let Some(client) = &self.consensus {
                if !client.test_connection().await? {
                    return Err(Error::unavailable(format!("{}: not healthy", client.rpc_url())));
                }
            }
            Ok(())
        };

        tokio::time::timeout(timeout, probe).await.map_err(|_| {
            Error::timeout(format!("connection probe of node {}", self.index), timeout)
        })?
    }

    /// Probe each layer independently. A missing client reads as `false`.
    pub async fn check_connectivity(&self) -> Connectivity {
        let execute = async {
            match &self.execute {
                Some(client) => client.test_connection().await.unwrap_or(false),
                None => false,
            }
        };
        let consensus = async {
            match &self.consensus {
                Some(client) => client.test_connection().await.unwrap_or(false),
                None => false,
            }
        };
        let (execute_layer_connected, consensus_layer_connected) =
            futures::join!(execute, consensus);
        Connectivity {
            execute_layer_connected,
            consensus_layer_connected,
        }
    }

    /// Latest height: execution layer first, consensus layer second.
    pub async fn block_height(&self) -> Result<u64> {
        let mut failures = Vec::new();
        if let Some(client) = &self.execute {
            match client.block_number().await {
                Ok(height) => return Ok(height),
                Err(err) => failures.push(format!("execute layer: {err}")),
            }
        }
        if let Some(client) = &self.consensus {
            match client.block_height().await {
                Ok(height) => return Ok(height),
                Err(err) => failures.push(format!("consensus layer: {err}")),
            }
        }
        if failures.is_empty() {
            failures.push("no layer clients configured".to_owned());
        }
        Err(Error::unavailable(format!(
            "node {}: {}",
            self.index,
            failures.join("; ")
        )))
    }

    /// Sign `request` with `private_key` and submit it through this node.
    pub async fn send_transaction(
        &self,
        request: &TransactionRequest,
        private_key: &str,
    ) -> Result<TransactionResult> {
        let client = self.signing_client()?;
        let wallet = WalletFactory::create_wallet(ChainType::Evm, Some(private_key))?;
        client.send_transaction(request, &wallet).await
    }

    /// Like [`Self::send_transaction`] with an already constructed wallet.
    pub async fn send_transaction_from(
        &self,
        request: &TransactionRequest,
        wallet: &Wallet,
    ) -> Result<TransactionResult> {
        self.signing_client()?.send_transaction(request, wallet).await
    }

    fn signing_client(&self) -> Result<&Arc<dyn ExecuteLayerClient>> {
        self.execute
            .as_ref()
            .filter(|client| client.chain_type() == ChainType::Evm)
            .ok_or_else(|| Error::unsupported(self.index, "raw transaction submission"))
    }

    /// Generic execution-layer JSON-RPC call.
    pub async fn rpc_call(&self, method: &str, params: Value) -> Result<Value> {
        self.execute_client()?.rpc_call(method, params).await
    }

    /// Generic consensus-layer path call.
    pub async fn consensus_rpc_call(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        self.consensus_client()?.rpc_call(path, params).await
    }

    /// Release both layer clients. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        let released = self.execute.take().is_some() | self.consensus.take().is_some();
        if released {
            debug!(node = self.index, "layer clients released");
        }
    }
}

/// Builder for [`BlockchainNode`] with injected clients.
#[derive(Debug)]
pub struct BlockchainNodeBuilder {
    node: BlockchainNode,
}

impl BlockchainNodeBuilder {
    fn new(index: u32, node_type: NodeType) -> Self {
        Self {
            node: BlockchainNode {
                index,
                node_type,
                active: true,
                chain_type: ChainType::Evm,
                url: None,
                execute_layer_url: None,
                consensus_layer_url: None,
                execute_layer_port: PortSetting::Default,
                consensus_layer_port: PortSetting::Default,
                voting_power: None,
                execute: None,
                consensus: None,
            },
        }
    }

    /// Set the initial activation flag (default `true`).
    #[must_use]
    pub const fn active(mut self, active: bool) -> Self {
        self.node.active = active;
        self
    }

    /// Set the chain family (default EVM).
    #[must_use]
    pub const fn chain_type(mut self, chain_type: ChainType) -> Self {
        self.node.chain_type = chain_type;
        self
    }

    /// Set the base URL.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.node.url = Some(url.into());
        self
    }

    /// Set the execution-layer port.
    #[must_use]
    pub const fn execute_layer_port(mut self, port: PortSetting) -> Self {
        self.node.execute_layer_port = port;
        self
    }

    /// Set the consensus-layer port.
    #[must_use]
    pub const fn consensus_layer_port(mut self, port: PortSetting) -> Self {
        self.node.consensus_layer_port = port;
        self
    }

    /// Set the voting power.
    #[must_use]
    pub const fn voting_power(mut self, power: u64) -> Self {
        self.node.voting_power = Some(power);
        self
    }

    /// Inject an execution-layer client.
    #[must_use]
    pub fn execute_client(mut self, client: Arc<dyn ExecuteLayerClient>) -> Self {
        self.node.execute = Some(client);
        self
    }

    /// Inject a consensus-layer client.
    #[must_use]
    pub fn consensus_client(mut self, client: Arc<dyn ConsensusLayerClient>) -> Self {
        self.node.consensus = Some(client);
        self
    }

    /// Finish the node.
    #[must_use]
    pub fn build(self) -> BlockchainNode {
        self.node
    }
}
