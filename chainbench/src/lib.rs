//! Chainbench is the core of a conformance test harness for multi-node
//! blockchain networks with separate execution and consensus layers.
//!
//! A [`Blockchain`] is built from a JSON network description and owns one
//! [`BlockchainNode`] per configured node. Each node carries at most one
//! execution-layer client (EVM JSON-RPC) and one consensus-layer client
//! (CometBFT RPC). Test scenarios route calls through the orchestrator, which
//! handles node selection, nonce-ordered transaction batches, confirmation
//! waits and voting-power based validator selection.
//!
//! ```no_run
//! use chainbench::Blockchain;
//!
//! # async fn run() -> chainbench::Result<()> {
//! let chain = Blockchain::connect_network_from_config_file("devnet", "network.json")?;
//! let height = chain.block_height(None).await?;
//! println!("height {height}");
//! # Ok(())
//! # }
//! ```

pub mod blockchain;
pub mod client;
pub mod config;
pub mod error;
pub mod node;
pub mod types;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use blockchain::{
    Blockchain, BlockchainBuilder, ConfirmationOutcome, ConfirmedTransfer, FundingOutcome,
    NetworkInfo, RpcValidator, ValidatorSelection, VotingPowerScenario, WaitOptions,
};
pub use client::{ConsensusLayerClient, ExecuteLayerClient, HttpClientConfig};
pub use config::{NetworkConfig, NodeConfig, PortSetting, WalletConfig};
pub use error::{Error, Result, WalletError};
pub use node::{BlockchainNode, BlockchainNodeBuilder};
pub use types::{
    ChainType, ConsensusLayer, Layer, NodeType, TransactionReceipt, TransactionRequest,
    TransactionResult, TxStatus,
};
pub use wallet::{Wallet, WalletFactory};
