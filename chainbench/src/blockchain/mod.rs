//! Blockchain orchestrator: node selection, health, transactions and waits.
//!
//! # Architecture
//!
//! ```text
//! Blockchain
//!   ├── nodes: Vec<BlockchainNode>       configuration order, unique indices
//!   │     ├── ExecuteLayerClient         one per node
//!   │     └── ConsensusLayerClient       one per node
//!   ├── public endpoint clients          load-balanced URLs, bypass `nodes`
//!   ├── founder wallet                   default funding source
//!   └── RpcValidator                     optional response validation
//! ```
//!
//! Every per-node operation resolves its node the same way: an explicit index
//! wins, otherwise the first active node that is not a bootnode.
//!
//! Mutation (activation, removal, founder replacement) takes `&mut self`;
//! orchestration takes `&self`, so in-flight operations never observe a
//! changing node set.

mod rpc;
mod transactions;
mod validators;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use rpc::RpcValidator;
pub use transactions::{
    ConfirmationOutcome, ConfirmedTransfer, DEFAULT_CONFIRMATION_TIMEOUT, DEFAULT_FUNDING_AMOUNT,
    DEFAULT_RECEIPT_POLL_INTERVAL, FundingOutcome,
};
pub use validators::{ValidatorSelection, VotingPowerScenario, select_validators};

use crate::client::{
    CometBftConsensusClient, ConsensusLayerClient, CosmosRestClient, EvmExecuteClient,
    ExecuteLayerClient,
};
use crate::config::{ChainId, NetworkConfig};
use crate::error::{Error, Result, WalletError};
use crate::node::BlockchainNode;
use crate::types::{ChainType, ConsensusLayer, Layer, NodeHealth, NodeType};
use crate::wallet::{EvmWallet, Wallet, WalletFactory};

/// Default poll interval of [`Blockchain::wait_for_block_number`].
pub const DEFAULT_BLOCK_NUMBER_POLL: Duration = Duration::from_millis(1000);

/// Default poll interval of [`Blockchain::wait_for_blocks`].
pub const DEFAULT_BLOCKS_POLL: Duration = Duration::from_millis(3000);

/// Default bound on block waits.
pub const DEFAULT_BLOCK_WAIT_TIMEOUT: Duration = Duration::from_secs(600);

/// Polling parameters for block waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Sleep between height checks.
    pub poll_interval: Duration,
    /// Overall bound; expiry fails with [`Error::Timeout`].
    pub timeout: Duration,
}

impl WaitOptions {
    /// Defaults for [`Blockchain::wait_for_block_number`].
    #[must_use]
    pub const fn block_number() -> Self {
        Self {
            poll_interval: DEFAULT_BLOCK_NUMBER_POLL,
            timeout: DEFAULT_BLOCK_WAIT_TIMEOUT,
        }
    }

    /// Defaults for [`Blockchain::wait_for_blocks`].
    #[must_use]
    pub const fn blocks() -> Self {
        Self {
            poll_interval: DEFAULT_BLOCKS_POLL,
            timeout: DEFAULT_BLOCK_WAIT_TIMEOUT,
        }
    }

    /// Replace the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Replace the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Snapshot returned by [`Blockchain::network_info`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    /// Network name.
    pub name: String,
    /// Configured chain id.
    pub chain_id: Option<String>,
    /// Execution family.
    pub execute_layer: ChainType,
    /// Consensus engine.
    pub consensus_layer: ConsensusLayer,
    /// Node count.
    pub total_nodes: usize,
    /// Active node count.
    pub active_nodes: usize,
    /// Active validator count.
    pub validators: usize,
    /// Height seen through the default node.
    pub block_height: Option<u64>,
    /// Chain id reported by the default execution client.
    pub reported_chain_id: Option<u64>,
    /// Why the live fields are missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A configured test network.
#[derive(Debug)]
pub struct Blockchain {
    name: String,
    chain_id: Option<ChainId>,
    execute_layer: ChainType,
    consensus_layer: ConsensusLayer,
    chain_type: ChainType,
    nodes: Vec<BlockchainNode>,
    founder_wallet: Option<Wallet>,
    execute_layer_http_rpc_url: Option<String>,
    consensus_layer_rpc_url: Option<String>,
    consensus_layer_http_rest_api_url: Option<String>,
    timeout: Option<Duration>,
    receipt_poll_interval: Duration,
    public_execute: Option<Arc<dyn ExecuteLayerClient>>,
    public_consensus: Option<Arc<dyn ConsensusLayerClient>>,
    public_rest: Option<Arc<dyn ConsensusLayerClient>>,
    validator: Option<Arc<dyn RpcValidator>>,
}

impl Blockchain {
    /// Create a builder for a network assembled from prepared nodes.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> BlockchainBuilder {
        BlockchainBuilder::new(name)
    }

    /// Connect to the network described by `config`.
    ///
    /// Every missing required field is reported in one
    /// [`Error::InvalidConfiguration`]. Nodes keep configuration order.
    pub fn connect_network_from_config(name: &str, config: &NetworkConfig) -> Result<Self> {
        config.validate()?;
        let (Some(execute_layer), Some(consensus_layer)) =
            (config.execute_layer, config.consensus_layer)
        else {
            return Err(Error::missing_fields(config.missing_fields()));
        };
        let chain_type = config.chain_type.unwrap_or(execute_layer);
        let http = config.http.clone().unwrap_or_default();

        let mut builder = Self::builder(name)
            .execute_layer(execute_layer)
            .consensus_layer(consensus_layer)
            .chain_type(chain_type);
        if let Some(chain_id) = config.chain_id.clone() {
            builder = builder.chain_id(chain_id);
        }
        if let Some(ms) = config.timeout {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        for node in &config.nodes {
            builder = builder.node(BlockchainNode::from_config(node, chain_type, &http)?);
        }

        if let Some(wallet) = &config.founder_wallet {
            builder =
                builder.founder_wallet(WalletFactory::create_wallet_from_config(chain_type, wallet)?);
        }

        if let Some(url) = config.execute_layer_http_rpc_url.as_deref() {
            builder = builder.execute_layer_http_rpc_url(url);
            if execute_layer == ChainType::Evm {
                let client = EvmExecuteClient::connect(url, &http)?;
                builder = builder.public_execute_client(Arc::new(client));
            }
        }
        if let Some(url) = config.consensus_layer_rpc_url.as_deref() {
            builder = builder
                .consensus_layer_rpc_url(url)
                .public_consensus_client(Arc::new(CometBftConsensusClient::connect(url, &http)?));
        }
        if let Some(url) = config.consensus_layer_http_rest_api_url.as_deref() {
            builder = builder
                .consensus_layer_http_rest_api_url(url)
                .public_rest_client(Arc::new(CosmosRestClient::connect(url, &http)?));
        }

        let blockchain = builder.build()?;
        info!(
            network = %blockchain.name,
            chain_id = ?blockchain.chain_id,
            execute_layer = %execute_layer,
            consensus_layer = %consensus_layer,
            nodes = blockchain.nodes.len(),
            "network connected",
        );
        Ok(blockchain)
    }

    /// Read `path` and connect to the network it describes.
    pub fn connect_network_from_config_file(name: &str, path: impl AsRef<Path>) -> Result<Self> {
        let config = NetworkConfig::from_file(path)?;
        Self::connect_network_from_config(name, &config)
    }

    /// Network name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured chain id.
    #[must_use]
    pub const fn chain_id(&self) -> Option<&ChainId> {
        self.chain_id.as_ref()
    }

    /// Execution family.
    #[must_use]
    pub const fn execute_layer(&self) -> ChainType {
        self.execute_layer
    }

    /// Consensus engine.
    #[must_use]
    pub const fn consensus_layer(&self) -> ConsensusLayer {
        self.consensus_layer
    }

    /// Chain family used for wallets.
    #[must_use]
    pub const fn chain_type(&self) -> ChainType {
        self.chain_type
    }

    /// Public execution-layer URL.
    #[must_use]
    pub fn execute_layer_http_rpc_url(&self) -> Option<&str> {
        self.execute_layer_http_rpc_url.as_deref()
    }

    /// Public consensus-layer RPC URL.
    #[must_use]
    pub fn consensus_layer_rpc_url(&self) -> Option<&str> {
        self.consensus_layer_rpc_url.as_deref()
    }

    /// Public REST API URL.
    #[must_use]
    pub fn consensus_layer_http_rest_api_url(&self) -> Option<&str> {
        self.consensus_layer_http_rest_api_url.as_deref()
    }

    /// Founder wallet, if configured.
    #[must_use]
    pub const fn founder_wallet(&self) -> Option<&Wallet> {
        self.founder_wallet.as_ref()
    }

    /// Network-level timeout from configuration.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    // ------------------------------------------------------------------------
    // Node selection
    // ------------------------------------------------------------------------

    /// All nodes in configuration order.
    #[must_use]
    pub fn nodes(&self) -> &[BlockchainNode] {
        &self.nodes
    }

    /// Node with `index`, or [`Error::NodeNotFound`].
    pub fn node(&self, index: u32) -> Result<&BlockchainNode> {
        self.nodes
            .iter()
            .find(|node| node.index() == index)
            .ok_or(Error::NodeNotFound(index))
    }

    /// Mutable node with `index`, or [`Error::NodeNotFound`].
    pub fn node_mut(&mut self, index: u32) -> Result<&mut BlockchainNode> {
        self.nodes
            .iter_mut()
            .find(|node| node.index() == index)
            .ok_or(Error::NodeNotFound(index))
    }

    /// First active node that is not a bootnode.
    pub fn default_node(&self) -> Result<&BlockchainNode> {
        self.nodes
            .iter()
            .find(|node| node.is_active() && !node.is_bootnode())
            .ok_or(Error::NoActiveNodes)
    }

    /// Explicit index if given, default node otherwise.
    pub fn resolve_node(&self, index: Option<u32>) -> Result<&BlockchainNode> {
        match index {
            Some(index) => self.node(index),
            None => self.default_node(),
        }
    }

    /// Active nodes in configuration order.
    pub fn active_nodes(&self) -> impl Iterator<Item = &BlockchainNode> {
        self.nodes.iter().filter(|node| node.is_active())
    }

    /// Active validator nodes in configuration order.
    pub fn validator_nodes(&self) -> impl Iterator<Item = &BlockchainNode> {
        self.nodes_by_type(NodeType::Validator)
            .filter(|node| node.is_active())
    }

    /// Nodes of `node_type`, active or not.
    pub fn nodes_by_type(&self, node_type: NodeType) -> impl Iterator<Item = &BlockchainNode> {
        self.nodes
            .iter()
            .filter(move |node| node.node_type() == node_type)
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Mark node `index` active.
    pub fn activate_node(&mut self, index: u32) -> Result<()> {
        self.node_mut(index)?.set_active(true);
        info!(node = index, "node activated");
        Ok(())
    }

    /// Mark node `index` inactive, simulating an outage.
    pub fn deactivate_node(&mut self, index: u32) -> Result<()> {
        self.node_mut(index)?.set_active(false);
        info!(node = index, "node deactivated");
        Ok(())
    }

    /// Remove node `index`, preserving the order of the others.
    pub fn remove_node(&mut self, index: u32) -> Result<BlockchainNode> {
        let position = self
            .nodes
            .iter()
            .position(|node| node.index() == index)
            .ok_or(Error::NodeNotFound(index))?;
        info!(node = index, "node removed");
        Ok(self.nodes.remove(position))
    }

    /// Replace the founder wallet.
    pub fn set_founder_wallet(&mut self, wallet: Option<Wallet>) {
        self.founder_wallet = wallet;
    }

    /// Replace the network-level timeout.
    pub const fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Replace the receipt poll interval used by confirmation waits.
    pub const fn set_receipt_poll_interval(&mut self, interval: Duration) {
        self.receipt_poll_interval = interval;
    }

    /// Install a response validator for `make_*` calls that pass schemas.
    pub fn set_validator(&mut self, validator: Arc<dyn RpcValidator>) {
        self.validator = Some(validator);
    }

    // ------------------------------------------------------------------------
    // Clients
    // ------------------------------------------------------------------------

    /// Execution client of the default node.
    pub fn default_execute_layer_client(&self) -> Result<&Arc<dyn ExecuteLayerClient>> {
        self.default_node()?.execute_client()
    }

    /// Consensus client of the default node.
    pub fn default_consensus_layer_client(&self) -> Result<&Arc<dyn ConsensusLayerClient>> {
        self.default_node()?.consensus_client()
    }

    /// Client for `executeLayerHttpRpcUrl`.
    pub fn public_execute_layer_client(&self) -> Result<&Arc<dyn ExecuteLayerClient>> {
        self.public_execute
            .as_ref()
            .ok_or(Error::PublicEndpointNotConfigured(Layer::Execute))
    }

    /// Client for `consensusLayerRpcUrl`.
    pub fn public_consensus_layer_client(&self) -> Result<&Arc<dyn ConsensusLayerClient>> {
        self.public_consensus
            .as_ref()
            .ok_or(Error::PublicEndpointNotConfigured(Layer::Consensus))
    }

    /// Client for `consensusLayerHttpRestApiUrl`.
    pub fn public_rest_client(&self) -> Result<&Arc<dyn ConsensusLayerClient>> {
        self.public_rest
            .as_ref()
            .ok_or(Error::PublicEndpointNotConfigured(Layer::Rest))
    }

    // ------------------------------------------------------------------------
    // Health
    // ------------------------------------------------------------------------

    /// Probe every active node.
    ///
    /// Inactive nodes are absent from the map. So are active nodes without any
    /// client: untestable is not the same as tested and failed.
    pub async fn test_connectivity(&self, timeout: Option<Duration>) -> BTreeMap<u32, bool> {
        let probes = self
            .active_nodes()
            .map(|node| async move { (node.index(), node.test_connection(timeout).await) });

        join_all(probes)
            .await
            .into_iter()
            .filter_map(|(index, outcome)| match outcome {
                Ok(connected) => Some((index, connected)),
                Err(err) if err.is_no_client() => {
                    debug!(node = index, "no layer client, skipped");
                    None
                }
                Err(err) => {
                    debug!(node = index, error = %err, "connectivity probe failed");
                    Some((index, false))
                }
            })
            .collect()
    }

    /// Health of every node, including inactive and untestable ones.
    pub async fn health_check(&self) -> BTreeMap<u32, NodeHealth> {
        let probes = self.nodes.iter().map(|node| async move {
            let (connected, error) = match node.probe(None).await {
                Ok(()) => (true, None),
                Err(err) => (false, Some(err.to_string())),
            };
            let health = NodeHealth {
                index: node.index(),
                node_type: node.node_type(),
                active: node.is_active(),
                connected,
                error,
            };
            (node.index(), health)
        });
        join_all(probes).await.into_iter().collect()
    }

    // ------------------------------------------------------------------------
    // Wallets
    // ------------------------------------------------------------------------

    /// Fresh random wallet, for the network's chain type by default.
    pub fn create_wallet(&self, chain_type: Option<ChainType>) -> Result<Wallet> {
        WalletFactory::create_wallet(chain_type.unwrap_or(self.chain_type), None)
    }

    /// The founder key as an EVM signer.
    pub fn create_founder_evm_wallet(&self) -> Result<EvmWallet> {
        match self.founder_wallet.as_ref().ok_or(Error::NoFounderWallet)? {
            Wallet::Evm(wallet) => Ok(wallet.clone()),
            Wallet::Cosmos(wallet) => {
                let key = wallet
                    .private_key_hex()
                    .ok_or_else(|| WalletError::MissingKey(wallet.address().to_owned()))?;
                Ok(EvmWallet::from_private_key(&key)?)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Heights
    // ------------------------------------------------------------------------

    /// Latest height of the resolved node.
    pub async fn block_height(&self, node: Option<u32>) -> Result<u64> {
        self.resolve_node(node)?.block_height().await
    }

    /// Wait until the resolved node reports a height of at least `target`.
    pub async fn wait_for_block_number(
        &self,
        target: u64,
        node: Option<u32>,
        options: Option<WaitOptions>,
    ) -> Result<u64> {
        let node = self.resolve_node(node)?;
        poll_until_height(node, target, options.unwrap_or_else(WaitOptions::block_number)).await
    }

    /// Wait for `count` blocks past the current height of the resolved node.
    pub async fn wait_for_blocks(
        &self,
        count: u64,
        node: Option<u32>,
        options: Option<WaitOptions>,
    ) -> Result<u64> {
        let node = self.resolve_node(node)?;
        let start = node.block_height().await?;
        let target = start.saturating_add(count);
        debug!(node = node.index(), start, target, "waiting for blocks");
        poll_until_height(node, target, options.unwrap_or_else(WaitOptions::blocks)).await
    }

    // ------------------------------------------------------------------------
    // Info & validators
    // ------------------------------------------------------------------------

    /// Static configuration plus live height and chain id.
    ///
    /// Never fails; a live lookup failure is reported in `error`.
    pub async fn network_info(&self) -> NetworkInfo {
        let mut info = NetworkInfo {
            name: self.name.clone(),
            chain_id: self.chain_id.as_ref().map(ToString::to_string),
            execute_layer: self.execute_layer,
            consensus_layer: self.consensus_layer,
            total_nodes: self.nodes.len(),
            active_nodes: self.active_nodes().count(),
            validators: self.validator_nodes().count(),
            block_height: None,
            reported_chain_id: None,
            error: None,
        };

        let live = async {
            let node = self.default_node()?;
            let height = node.block_height().await?;
            let chain_id = match node.execute_client() {
                Ok(client) => Some(client.chain_id().await?),
                Err(_) => None,
            };
            Ok::<_, Error>((height, chain_id))
        };

        match live.await {
            Ok((height, chain_id)) => {
                info.block_height = Some(height);
                info.reported_chain_id = chain_id;
            }
            Err(err) => {
                warn!(network = %self.name, error = %err, "network info incomplete");
                info.error = Some(err.to_string());
            }
        }
        info
    }

    /// Select active validators controlling the scenario's share of power.
    ///
    /// Validators without configured voting power count as zero.
    #[must_use]
    pub fn select_validators_by_voting_power(
        &self,
        scenario: VotingPowerScenario,
    ) -> ValidatorSelection {
        select_validators(
            self.validator_nodes()
                .map(|node| (node.index(), node.voting_power().unwrap_or(0))),
            scenario,
        )
    }

    /// Release every node's clients and the public endpoint clients.
    ///
    /// Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        for node in &mut self.nodes {
            node.cleanup();
        }
        self.public_execute = None;
        self.public_consensus = None;
        self.public_rest = None;
        debug!(network = %self.name, "network resources released");
    }
}

async fn poll_until_height(node: &BlockchainNode, target: u64, options: WaitOptions) -> Result<u64> {
    tokio::time::timeout(options.timeout, poll_height(node, target, options.poll_interval))
        .await
        .map_err(|_| {
            Error::timeout(
                format!("waiting for block {target} on node {}", node.index()),
                options.timeout,
            )
        })?
}

async fn poll_height(node: &BlockchainNode, target: u64, poll_interval: Duration) -> Result<u64> {
    loop {
        let height = node.block_height().await?;
        if height >= target {
            return Ok(height);
        }
        debug!(node = node.index(), height, target, "block not reached");
        tokio::time::sleep(poll_interval).await;
    }
}

/// Builder for [`Blockchain`].
#[derive(Debug)]
pub struct BlockchainBuilder {
    name: String,
    chain_id: Option<ChainId>,
    execute_layer: ChainType,
    consensus_layer: ConsensusLayer,
    chain_type: Option<ChainType>,
    nodes: Vec<BlockchainNode>,
    founder_wallet: Option<Wallet>,
    execute_layer_http_rpc_url: Option<String>,
    consensus_layer_rpc_url: Option<String>,
    consensus_layer_http_rest_api_url: Option<String>,
    timeout: Option<Duration>,
    public_execute: Option<Arc<dyn ExecuteLayerClient>>,
    public_consensus: Option<Arc<dyn ConsensusLayerClient>>,
    public_rest: Option<Arc<dyn ConsensusLayerClient>>,
    validator: Option<Arc<dyn RpcValidator>>,
}

impl BlockchainBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chain_id: None,
            execute_layer: ChainType::Evm,
            consensus_layer: ConsensusLayer::CometBft,
            chain_type: None,
            nodes: Vec::new(),
            founder_wallet: None,
            execute_layer_http_rpc_url: None,
            consensus_layer_rpc_url: None,
            consensus_layer_http_rest_api_url: None,
            timeout: None,
            public_execute: None,
            public_consensus: None,
            public_rest: None,
            validator: None,
        }
    }

    /// Set the chain id.
    #[must_use]
    pub fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Set the execution family (default EVM).
    #[must_use]
    pub const fn execute_layer(mut self, execute_layer: ChainType) -> Self {
        self.execute_layer = execute_layer;
        self
    }

    /// Set the consensus engine (default CometBFT).
    #[must_use]
    pub const fn consensus_layer(mut self, consensus_layer: ConsensusLayer) -> Self {
        self.consensus_layer = consensus_layer;
        self
    }

    /// Set the wallet chain type (defaults to the execution family).
    #[must_use]
    pub const fn chain_type(mut self, chain_type: ChainType) -> Self {
        self.chain_type = Some(chain_type);
        self
    }

    /// Append a node.
    #[must_use]
    pub fn node(mut self, node: BlockchainNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Set the founder wallet.
    #[must_use]
    pub fn founder_wallet(mut self, wallet: Wallet) -> Self {
        self.founder_wallet = Some(wallet);
        self
    }

    /// Set the network-level timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Record the public execution-layer URL.
    #[must_use]
    pub fn execute_layer_http_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.execute_layer_http_rpc_url = Some(url.into());
        self
    }

    /// Record the public consensus-layer RPC URL.
    #[must_use]
    pub fn consensus_layer_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.consensus_layer_rpc_url = Some(url.into());
        self
    }

    /// Record the public REST API URL.
    #[must_use]
    pub fn consensus_layer_http_rest_api_url(mut self, url: impl Into<String>) -> Self {
        self.consensus_layer_http_rest_api_url = Some(url.into());
        self
    }

    /// Set the public execution-layer client.
    #[must_use]
    pub fn public_execute_client(mut self, client: Arc<dyn ExecuteLayerClient>) -> Self {
        self.public_execute = Some(client);
        self
    }

    /// Set the public consensus-layer client.
    #[must_use]
    pub fn public_consensus_client(mut self, client: Arc<dyn ConsensusLayerClient>) -> Self {
        self.public_consensus = Some(client);
        self
    }

    /// Set the public REST client.
    #[must_use]
    pub fn public_rest_client(mut self, client: Arc<dyn ConsensusLayerClient>) -> Self {
        self.public_rest = Some(client);
        self
    }

    /// Install a response validator.
    #[must_use]
    pub fn validator(mut self, validator: Arc<dyn RpcValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Finish the network, rejecting duplicate node indices.
    pub fn build(self) -> Result<Blockchain> {
        let mut seen = std::collections::HashSet::with_capacity(self.nodes.len());
        if let Some(node) = self.nodes.iter().find(|node| !seen.insert(node.index())) {
            return Err(Error::invalid_config(format!(
                "duplicate node index {}",
                node.index()
            )));
        }

        Ok(Blockchain {
            name: self.name,
            chain_id: self.chain_id,
            execute_layer: self.execute_layer,
            consensus_layer: self.consensus_layer,
            chain_type: self.chain_type.unwrap_or(self.execute_layer),
            nodes: self.nodes,
            founder_wallet: self.founder_wallet,
            execute_layer_http_rpc_url: self.execute_layer_http_rpc_url,
            consensus_layer_rpc_url: self.consensus_layer_rpc_url,
            consensus_layer_http_rest_api_url: self.consensus_layer_http_rest_api_url,
            timeout: self.timeout,
            receipt_poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
            public_execute: self.public_execute,
            public_consensus: self.public_consensus,
            public_rest: self.public_rest,
            validator: self.validator,
        })
    }
}
