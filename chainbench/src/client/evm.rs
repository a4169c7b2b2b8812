//! EVM execution-layer client over an alloy HTTP provider.

use std::borrow::Cow;
use std::fmt;

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{Ethereum, EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest as RpcTransactionRequest;
use alloy::transports::TransportError;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

use super::{ExecuteLayerClient, HttpClientConfig, parse_url};
use crate::error::{Error, Result};
use crate::types::{
    ChainType, FeeData, TransactionReceipt, TransactionRequest, TransactionResult, TxStatus,
};
use crate::wallet::Wallet;

/// JSON-RPC client for an EVM endpoint.
///
/// Transactions are signed locally and submitted with
/// `eth_sendRawTransaction`, so the endpoint never needs unlocked accounts.
pub struct EvmExecuteClient {
    provider: DynProvider<Ethereum>,
    url: String,
    chain_id: OnceCell<u64>,
}

impl fmt::Debug for EvmExecuteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvmExecuteClient")
            .field("url", &self.url)
            .field("chain_id", &self.chain_id.get())
            .finish_non_exhaustive()
    }
}

impl EvmExecuteClient {
    /// Create a client for the HTTP endpoint at `url`, sharing the timeout and
    /// user agent of `http`.
    pub fn connect(url: &str, http: &HttpClientConfig) -> Result<Self> {
        let parsed = parse_url(url)?;
        let provider = ProviderBuilder::new()
            .connect_reqwest(http.build_client()?, parsed)
            .erased();
        Ok(Self::with_provider(provider, url))
    }

    /// Wrap an existing provider.
    #[must_use]
    pub fn with_provider(provider: DynProvider<Ethereum>, url: impl Into<String>) -> Self {
        Self {
            provider,
            url: url.into(),
            chain_id: OnceCell::new(),
        }
    }

    /// The underlying provider.
    #[must_use]
    pub const fn provider(&self) -> &DynProvider<Ethereum> {
        &self.provider
    }

    async fn count_of(&self, address: Address, pending: bool) -> Result<u64> {
        let count = if pending {
            self.provider.get_transaction_count(address).pending().await
        } else {
            self.provider.get_transaction_count(address).await
        };
        count.map_err(transport_error)
    }
}

fn transport_error(err: TransportError) -> Error {
    match err.as_error_resp() {
        Some(payload) => Error::Rpc {
            code: payload.code,
            message: payload.message.to_string(),
        },
        None => Error::unavailable(err.to_string()),
    }
}

fn parse_address(address: &str) -> Result<Address> {
    address
        .trim()
        .parse()
        .map_err(|e| Error::Transaction(format!("invalid address '{address}': {e}")))
}

#[async_trait]
impl ExecuteLayerClient for EvmExecuteClient {
    fn chain_type(&self) -> ChainType {
        ChainType::Evm
    }

    fn rpc_url(&self) -> &str {
        &self.url
    }

    async fn test_connection(&self) -> Result<bool> {
        let listening = self
            .provider
            .raw_request::<_, bool>(Cow::Borrowed("net_listening"), Vec::<Value>::new())
            .await;
        match listening {
            Ok(listening) => Ok(listening),
            // Some nodes disable the `net` namespace; any answer proves liveness.
            Err(err) if err.is_error_resp() => self.block_number().await.map(|_| true),
            Err(err) => Err(transport_error(err)),
        }
    }

    async fn block_number(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(transport_error)
    }

    async fn chain_id(&self) -> Result<u64> {
        self.chain_id
            .get_or_try_init(|| async {
                self.provider.get_chain_id().await.map_err(transport_error)
            })
            .await
            .copied()
    }

    async fn transaction_count(&self, address: &str, pending: bool) -> Result<u64> {
        self.count_of(parse_address(address)?, pending).await
    }

    async fn balance(&self, address: &str) -> Result<U256> {
        self.provider
            .get_balance(parse_address(address)?)
            .await
            .map_err(transport_error)
    }

    async fn fee_data(&self) -> Result<FeeData> {
        let gas_price = self.provider.get_gas_price().await.map_err(transport_error);
        match self.provider.estimate_eip1559_fees().await {
            Ok(estimate) => Ok(FeeData {
                gas_price: gas_price.ok(),
                max_fee_per_gas: Some(estimate.max_fee_per_gas),
                max_priority_fee_per_gas: Some(estimate.max_priority_fee_per_gas),
            }),
            Err(err) => {
                debug!(url = %self.url, error = %err, "EIP-1559 fee estimation unavailable");
                Ok(FeeData {
                    gas_price: Some(gas_price?),
                    ..FeeData::default()
                })
            }
        }
    }

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
        wallet: &Wallet,
    ) -> Result<TransactionResult> {
        let signer = wallet.evm_signer()?.clone();
        let from = signer.address();
        let to = parse_address(&request.to)?;
        let value = U256::from_str_radix(request.amount.trim(), 10).map_err(|e| {
            Error::Transaction(format!("invalid amount '{}': {e}", request.amount))
        })?;

        let mut tx = RpcTransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_value(value)
            .with_chain_id(self.chain_id().await?);

        if let Some(data) = request.data.as_deref() {
            let input = data
                .parse::<Bytes>()
                .map_err(|e| Error::Transaction(format!("invalid calldata: {e}")))?;
            tx = tx.with_input(input);
        }

        let nonce = match request.nonce {
            Some(nonce) => nonce,
            None => self.count_of(from, true).await?,
        };
        tx = tx.with_nonce(nonce);

        let has_fees = request.gas_price.is_some() || request.max_fee_per_gas.is_some();
        let fees = if has_fees {
            FeeData {
                gas_price: request.gas_price,
                max_fee_per_gas: request.max_fee_per_gas,
                max_priority_fee_per_gas: request.max_priority_fee_per_gas,
            }
        } else {
            self.fee_data().await?
        };
        if let Some(max_fee) = fees.max_fee_per_gas {
            tx = tx
                .with_max_fee_per_gas(max_fee)
                .with_max_priority_fee_per_gas(fees.max_priority_fee_per_gas.unwrap_or_default());
        } else if let Some(gas_price) = fees.gas_price {
            tx = tx.with_gas_price(gas_price);
        }

        let gas_limit = match request.gas_limit {
            Some(gas) => gas,
            None => self
                .provider
                .estimate_gas(tx.clone())
                .await
                .map_err(transport_error)?,
        };
        tx = tx.with_gas_limit(gas_limit);

        let envelope = tx
            .build(&EthereumWallet::from(signer))
            .await
            .map_err(|e| Error::Transaction(format!("signing failed: {e}")))?;
        let pending = self
            .provider
            .send_raw_transaction(&envelope.encoded_2718())
            .await
            .map_err(transport_error)?;
        let hash = *pending.tx_hash();

        debug!(url = %self.url, hash = %hash, nonce, "transaction submitted");

        Ok(TransactionResult {
            hash: format!("{hash:#x}"),
            status: TxStatus::Pending,
            from: from.to_checksum(None),
            to: to.to_checksum(None),
            nonce: Some(nonce),
            block_number: None,
            block_hash: None,
            gas_used: None,
        })
    }

    async fn transaction_receipt(&self, hash: &str) -> Result<Option<TransactionReceipt>> {
        let tx_hash = hash
            .trim()
            .parse::<B256>()
            .map_err(|e| Error::Transaction(format!("invalid transaction hash '{hash}': {e}")))?;
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(transport_error)?;

        Ok(receipt.and_then(|receipt| {
            let block_number = ReceiptResponse::block_number(&receipt)?;
            Some(TransactionReceipt {
                hash: format!("{tx_hash:#x}"),
                block_number,
                block_hash: ReceiptResponse::block_hash(&receipt).map(|h| format!("{h:#x}")),
                gas_used: ReceiptResponse::gas_used(&receipt),
                success: ReceiptResponse::status(&receipt),
            })
        }))
    }

    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value> {
        self.provider
            .raw_request::<_, Value>(Cow::Owned(method.to_owned()), params)
            .await
            .map_err(transport_error)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use alloy::providers::mock::Asserter;
    use serde_json::json;

    use super::*;

    fn mocked() -> (Asserter, EvmExecuteClient) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .connect_mocked_client(asserter.clone())
            .erased();
        (asserter, EvmExecuteClient::with_provider(provider, "http://mock"))
    }

    #[tokio::test]
    async fn test_silent_endpoint_is_bounded_by_http_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept connections and never answer.
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let http = HttpClientConfig {
            timeout_secs: Some(1),
            ..HttpClientConfig::default()
        };
        let client = EvmExecuteClient::connect(&format!("http://{addr}"), &http).unwrap();
        let outcome = tokio::time::timeout(Duration::from_secs(10), client.block_number())
            .await
            .expect("request should give up on its own");
        assert!(matches!(outcome, Err(Error::RpcUnavailable(_))));
    }

    #[tokio::test]
    async fn test_block_number() {
        let (asserter, client) = mocked();
        asserter.push_success(&json!("0x10"));
        assert_eq!(client.block_number().await.unwrap(), 16);
    }

    #[tokio::test]
    async fn test_chain_id_is_cached() {
        let (asserter, client) = mocked();
        asserter.push_success(&json!("0x2328"));
        assert_eq!(client.chain_id().await.unwrap(), 9000);
        // No second response queued: a repeated RPC would fail.
        assert_eq!(client.chain_id().await.unwrap(), 9000);
    }

    #[tokio::test]
    async fn test_unmined_receipt_is_none() {
        let (asserter, client) = mocked();
        asserter.push_success(&Value::Null);
        let hash = format!("{:#x}", B256::repeat_byte(0xab));
        assert!(client.transaction_receipt(&hash).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rpc_error_is_surfaced() {
        let (asserter, client) = mocked();
        asserter.push_failure_msg("method not found");
        let err = client.rpc_call("eth_foo", json!([])).await.unwrap_err();
        assert!(matches!(err, Error::Rpc { .. }));
    }

    #[tokio::test]
    async fn test_generic_rpc_call() {
        let (asserter, client) = mocked();
        asserter.push_success(&json!("0x1"));
        let value = client.rpc_call("eth_syncing", json!([])).await.unwrap();
        assert_eq!(value, json!("0x1"));
    }

    #[tokio::test]
    async fn test_invalid_hash_rejected_locally() {
        let (_asserter, client) = mocked();
        assert!(matches!(
            client.transaction_receipt("0x12").await,
            Err(Error::Transaction(_))
        ));
    }

    #[tokio::test]
    async fn test_watch_only_wallet_cannot_send() {
        let (_asserter, client) = mocked();
        let wallet: Wallet = crate::wallet::EvmWallet::watch(
            "0x0000000000000000000000000000000000000001",
        )
        .unwrap()
        .into();
        let request = TransactionRequest::transfer("0x0000000000000000000000000000000000000002", "1");
        assert!(matches!(
            client.send_transaction(&request, &wallet).await,
            Err(Error::Wallet(_))
        ));
    }
}
