//! Cosmos wallet: secp256k1 keys with bech32 addresses.
//!
//! The address is `bech32(prefix, ripemd160(sha256(compressed_pubkey)))`.

use std::fmt;

use alloy::primitives::hex;
use alloy::signers::local::PrivateKeySigner;
use bech32::{Bech32, Hrp};
use k256::ecdsa::SigningKey;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::error::WalletError;

/// Default bech32 human-readable prefix.
pub const DEFAULT_PREFIX: &str = "cosmos";

/// A Cosmos account, optionally holding its private key.
#[derive(Clone)]
pub struct CosmosWallet {
    signing_key: Option<SigningKey>,
    address: String,
    prefix: String,
}

impl fmt::Debug for CosmosWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmosWallet")
            .field("address", &self.address)
            .field("can_sign", &self.signing_key.is_some())
            .finish()
    }
}

impl PartialEq for CosmosWallet {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl CosmosWallet {
    /// Create a wallet from a hex private key under `prefix`.
    pub fn from_private_key(key: &str, prefix: &str) -> Result<Self, WalletError> {
        let key = key.trim();
        let bytes = hex::decode(key.strip_prefix("0x").unwrap_or(key))
            .map_err(|e| WalletError::Config(format!("invalid private key hex: {e}")))?;
        let signing_key = SigningKey::from_slice(&bytes)
            .map_err(|e| WalletError::Config(format!("invalid private key: {e}")))?;
        Self::from_signing_key(signing_key, prefix)
    }

    /// Generate a wallet from fresh random key material.
    pub fn random(prefix: &str) -> Result<Self, WalletError> {
        Self::from_signing_key(PrivateKeySigner::random().into_credential(), prefix)
    }

    /// An address-only wallet. The address must be valid bech32.
    pub fn watch(address: &str) -> Result<Self, WalletError> {
        let address = address.trim();
        let (hrp, _) = bech32::decode(address)
            .map_err(|e| WalletError::Config(format!("invalid bech32 address '{address}': {e}")))?;
        Ok(Self {
            signing_key: None,
            address: address.to_owned(),
            prefix: hrp.to_string(),
        })
    }

    fn from_signing_key(signing_key: SigningKey, prefix: &str) -> Result<Self, WalletError> {
        let address = bech32_address(&signing_key, prefix)?;
        Ok(Self {
            signing_key: Some(signing_key),
            address,
            prefix: prefix.to_owned(),
        })
    }

    /// The bech32 address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The bech32 prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `0x`-prefixed private key hex, if held.
    #[must_use]
    pub fn private_key_hex(&self) -> Option<String> {
        self.signing_key
            .as_ref()
            .map(|k| hex::encode_prefixed(k.to_bytes()))
    }

    /// Compressed SEC1 public key, if the key is held.
    #[must_use]
    pub fn public_key(&self) -> Option<Vec<u8>> {
        self.signing_key
            .as_ref()
            .map(|k| k.verifying_key().to_encoded_point(true).as_bytes().to_vec())
    }
}

fn bech32_address(signing_key: &SigningKey, prefix: &str) -> Result<String, WalletError> {
    let hrp = Hrp::parse(prefix)
        .map_err(|e| WalletError::Config(format!("invalid bech32 prefix '{prefix}': {e}")))?;
    let pubkey = signing_key.verifying_key().to_encoded_point(true);
    let account = Ripemd160::digest(Sha256::digest(pubkey.as_bytes()));
    bech32::encode::<Bech32>(hrp, &account)
        .map_err(|e| WalletError::Derivation(format!("bech32 encoding failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_private_key_is_deterministic() {
        let a = CosmosWallet::from_private_key(KEY, DEFAULT_PREFIX).unwrap();
        let b = CosmosWallet::from_private_key(KEY.trim_start_matches("0x"), DEFAULT_PREFIX)
            .unwrap();
        assert_eq!(a, b);
        assert!(a.address().starts_with("cosmos1"));
        assert_eq!(a.private_key_hex().as_deref(), Some(KEY));
        assert_eq!(a.public_key().unwrap().len(), 33);
    }

    #[test]
    fn test_prefix_applies() {
        let wallet = CosmosWallet::from_private_key(KEY, "osmo").unwrap();
        assert!(wallet.address().starts_with("osmo1"));
        assert_eq!(wallet.prefix(), "osmo");
    }

    #[test]
    fn test_watch_round_trips_generated_address() {
        let wallet = CosmosWallet::random(DEFAULT_PREFIX).unwrap();
        let watch = CosmosWallet::watch(wallet.address()).unwrap();
        assert_eq!(watch.address(), wallet.address());
        assert_eq!(watch.prefix(), DEFAULT_PREFIX);
        assert!(watch.private_key_hex().is_none());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(CosmosWallet::from_private_key("0x00", DEFAULT_PREFIX).is_err());
        assert!(CosmosWallet::watch("cosmos1notvalid").is_err());
    }
}
