//! Chain-family wallets and their factory.
//!
//! # Architecture
//!
//! ```text
//! WalletFactory
//!   ├── create_wallet(chain_type, key?)        → Wallet
//!   └── create_wallet_from_config(chain_type, &WalletConfig)
//!
//! Wallet
//!   ├── Evm(EvmWallet)       alloy PrivateKeySigner, kobe HD derivation
//!   └── Cosmos(CosmosWallet) k256 + bech32
//! ```
//!
//! Wallets are value objects: they hold key material and an address but
//! never any network state.

mod cosmos;
mod evm;
mod factory;

use alloy::signers::local::PrivateKeySigner;

pub use cosmos::{CosmosWallet, DEFAULT_PREFIX};
pub use evm::EvmWallet;
pub use factory::WalletFactory;

use crate::error::WalletError;
use crate::types::ChainType;

/// A wallet bound to one chain family.
#[derive(Debug, Clone, PartialEq)]
pub enum Wallet {
    /// EVM account.
    Evm(EvmWallet),
    /// Cosmos account.
    Cosmos(CosmosWallet),
}

impl Wallet {
    /// The family this wallet belongs to.
    #[must_use]
    pub const fn chain_type(&self) -> ChainType {
        match self {
            Self::Evm(_) => ChainType::Evm,
            Self::Cosmos(_) => ChainType::Cosmos,
        }
    }

    /// Display address: checksummed for EVM, bech32 for Cosmos.
    #[must_use]
    pub fn address(&self) -> String {
        match self {
            Self::Evm(w) => w.address_string(),
            Self::Cosmos(w) => w.address().to_owned(),
        }
    }

    /// `0x`-prefixed private key, if held.
    #[must_use]
    pub fn private_key(&self) -> Option<String> {
        match self {
            Self::Evm(w) => w.private_key_hex(),
            Self::Cosmos(w) => w.private_key_hex(),
        }
    }

    /// Whether this wallet can sign.
    #[must_use]
    pub fn can_sign(&self) -> bool {
        match self {
            Self::Evm(w) => w.signer().is_ok(),
            Self::Cosmos(w) => w.public_key().is_some(),
        }
    }

    /// The EVM view of this wallet.
    #[must_use]
    pub const fn as_evm(&self) -> Option<&EvmWallet> {
        match self {
            Self::Evm(w) => Some(w),
            Self::Cosmos(_) => None,
        }
    }

    /// The EVM signer, failing for Cosmos or watch-only wallets.
    pub fn evm_signer(&self) -> Result<&PrivateKeySigner, WalletError> {
        match self {
            Self::Evm(w) => w.signer(),
            Self::Cosmos(w) => Err(WalletError::config(format!(
                "wallet {} is a Cosmos wallet, not an EVM signer",
                w.address()
            ))),
        }
    }
}

impl From<EvmWallet> for Wallet {
    fn from(wallet: EvmWallet) -> Self {
        Self::Evm(wallet)
    }
}

impl From<CosmosWallet> for Wallet {
    fn from(wallet: CosmosWallet) -> Self {
        Self::Cosmos(wallet)
    }
}
