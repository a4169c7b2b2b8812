//! EVM wallet: secp256k1 keys with keccak-derived addresses.
//!
//! Signing goes through [`alloy`]'s `PrivateKeySigner`; HD derivation from a
//! mnemonic goes through [`kobe`] / [`kobe_eth`].

use std::fmt;

use alloy::primitives::{Address, hex};
use alloy::signers::SignerSync;
use alloy::signers::local::PrivateKeySigner;

use crate::error::WalletError;

/// An EVM account, optionally holding its private key.
#[derive(Clone)]
pub struct EvmWallet {
    signer: Option<PrivateKeySigner>,
    address: Address,
}

impl fmt::Debug for EvmWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvmWallet")
            .field("address", &self.address)
            .field("can_sign", &self.signer.is_some())
            .finish()
    }
}

impl PartialEq for EvmWallet {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl EvmWallet {
    /// Create a wallet from a hex private key, with or without `0x`.
    pub fn from_private_key(key: &str) -> Result<Self, WalletError> {
        let key = key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        let signer = key
            .parse::<PrivateKeySigner>()
            .map_err(|e| WalletError::Config(format!("invalid private key: {e}")))?;
        Ok(Self::from_signer(signer))
    }

    /// Derive a wallet from a BIP39 mnemonic at BIP44 index `index`.
    pub fn from_mnemonic(
        mnemonic: &str,
        passphrase: Option<&str>,
        index: u32,
    ) -> Result<Self, WalletError> {
        let wallet = kobe::Wallet::from_mnemonic(mnemonic, passphrase)
            .map_err(|e| WalletError::Derivation(format!("invalid mnemonic: {e}")))?;

        let deriver = kobe_eth::Deriver::new(&wallet);
        let derived = deriver
            .derive(index)
            .map_err(|e| WalletError::Derivation(format!("key derivation failed: {e}")))?;

        Self::from_private_key(&derived.private_key_hex)
    }

    /// Generate a wallet from fresh random key material.
    #[must_use]
    pub fn random() -> Self {
        Self::from_signer(PrivateKeySigner::random())
    }

    /// An address-only wallet that cannot sign.
    pub fn watch(address: &str) -> Result<Self, WalletError> {
        let address = address
            .trim()
            .parse::<Address>()
            .map_err(|e| WalletError::Config(format!("invalid EVM address '{address}': {e}")))?;
        Ok(Self {
            signer: None,
            address,
        })
    }

    fn from_signer(signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        Self {
            signer: Some(signer),
            address,
        }
    }

    /// The raw address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The EIP-55 checksummed address.
    #[must_use]
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }

    /// The signer, or [`WalletError::MissingKey`] for watch-only wallets.
    pub fn signer(&self) -> Result<&PrivateKeySigner, WalletError> {
        self.signer
            .as_ref()
            .ok_or_else(|| WalletError::MissingKey(self.address_string()))
    }

    /// `0x`-prefixed private key hex, if held.
    #[must_use]
    pub fn private_key_hex(&self) -> Option<String> {
        self.signer
            .as_ref()
            .map(|s| hex::encode_prefixed(s.to_bytes()))
    }

    /// EIP-191 personal-sign `message`, returning the `0x` signature.
    pub fn sign_message(&self, message: &[u8]) -> Result<String, WalletError> {
        let sig = self
            .signer()?
            .sign_message_sync(message)
            .map_err(|e| WalletError::Signing(format!("message signing failed: {e}")))?;
        Ok(hex::encode_prefixed(sig.as_bytes()))
    }
}
