//! Chain-type dispatch for wallet construction.

use super::{CosmosWallet, DEFAULT_PREFIX, EvmWallet, Wallet};
use crate::config::WalletConfig;
use crate::error::{Result, WalletError};
use crate::types::ChainType;

/// Constructs chain-family wallets. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalletFactory;

impl WalletFactory {
    /// Create a wallet from `private_key`, or a random one when absent.
    pub fn create_wallet(chain_type: ChainType, private_key: Option<&str>) -> Result<Wallet> {
        let wallet = match (chain_type, private_key) {
            (ChainType::Evm, Some(key)) => EvmWallet::from_private_key(key)?.into(),
            (ChainType::Evm, None) => EvmWallet::random().into(),
            (ChainType::Cosmos, Some(key)) => {
                CosmosWallet::from_private_key(key, DEFAULT_PREFIX)?.into()
            }
            (ChainType::Cosmos, None) => CosmosWallet::random(DEFAULT_PREFIX)?.into(),
        };
        Ok(wallet)
    }

    /// Like [`Self::create_wallet`] with the chain type given as a string.
    ///
    /// Unknown strings fail with [`crate::Error::UnsupportedChainType`].
    pub fn create_wallet_for(chain_type: &str, private_key: Option<&str>) -> Result<Wallet> {
        Self::create_wallet(chain_type.parse()?, private_key)
    }

    /// Create a wallet from configuration.
    ///
    /// Precedence: private key, mnemonic, watch-only address.
    pub fn create_wallet_from_config(chain_type: ChainType, config: &WalletConfig) -> Result<Wallet> {
        let prefix = config.prefix.as_deref().unwrap_or(DEFAULT_PREFIX);

        if let Some(key) = config.private_key.as_deref() {
            return Ok(match chain_type {
                ChainType::Evm => EvmWallet::from_private_key(key)?.into(),
                ChainType::Cosmos => CosmosWallet::from_private_key(key, prefix)?.into(),
            });
        }

        if let Some(mnemonic) = config.mnemonic.as_deref() {
            return match chain_type {
                ChainType::Evm => Ok(EvmWallet::from_mnemonic(
                    mnemonic,
                    config.passphrase.as_deref(),
                    config.index.unwrap_or(0),
                )?
                .into()),
                ChainType::Cosmos => Err(WalletError::config(
                    "mnemonic derivation is only supported for EVM wallets",
                )
                .into()),
            };
        }

        if let Some(address) = config.address.as_deref() {
            return Ok(match chain_type {
                ChainType::Evm => EvmWallet::watch(address)?.into(),
                ChainType::Cosmos => CosmosWallet::watch(address)?.into(),
            });
        }

        Err(WalletError::config("wallet config needs privateKey, mnemonic or address").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_create_wallet_per_chain_type() {
        let evm = WalletFactory::create_wallet(ChainType::Evm, Some(KEY)).unwrap();
        assert_eq!(evm.chain_type(), ChainType::Evm);
        assert_eq!(evm.address(), "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

        let cosmos = WalletFactory::create_wallet(ChainType::Cosmos, Some(KEY)).unwrap();
        assert_eq!(cosmos.chain_type(), ChainType::Cosmos);
        assert!(cosmos.address().starts_with("cosmos1"));
        assert_eq!(evm.private_key(), cosmos.private_key());
    }

    #[test]
    fn test_random_wallets() {
        let a = WalletFactory::create_wallet(ChainType::Evm, None).unwrap();
        let b = WalletFactory::create_wallet(ChainType::Evm, None).unwrap();
        assert_ne!(a.address(), b.address());
        assert!(a.can_sign());
    }

    #[test]
    fn test_unsupported_chain_type() {
        let err = WalletFactory::create_wallet_for("BITCOIN", None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedChainType(_)));
        assert!(WalletFactory::create_wallet_for("evm", Some(KEY)).is_ok());
    }

    #[test]
    fn test_from_config_precedence() {
        let config = WalletConfig {
            private_key: Some(KEY.into()),
            address: Some("0x0000000000000000000000000000000000000001".into()),
            ..WalletConfig::default()
        };
        let wallet = WalletFactory::create_wallet_from_config(ChainType::Evm, &config).unwrap();
        assert!(wallet.can_sign());

        let watch = WalletConfig {
            address: Some("0x0000000000000000000000000000000000000001".into()),
            ..WalletConfig::default()
        };
        let wallet = WalletFactory::create_wallet_from_config(ChainType::Evm, &watch).unwrap();
        assert!(!wallet.can_sign());
        assert!(wallet.private_key().is_none());
    }

    #[test]
    fn test_from_config_requires_material() {
        let err = WalletFactory::create_wallet_from_config(ChainType::Evm, &WalletConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Wallet(WalletError::Config(_))));

        let cosmos_mnemonic = WalletConfig {
            mnemonic: Some("test test test test test test test test test test test junk".into()),
            ..WalletConfig::default()
        };
        assert!(
            WalletFactory::create_wallet_from_config(ChainType::Cosmos, &cosmos_mnemonic).is_err()
        );
    }

    #[test]
    fn test_evm_signer_rejects_cosmos() {
        let cosmos = WalletFactory::create_wallet(ChainType::Cosmos, None).unwrap();
        assert!(cosmos.evm_signer().is_err());
        assert!(cosmos.as_evm().is_none());
    }
}
