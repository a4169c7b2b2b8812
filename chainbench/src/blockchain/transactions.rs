//! Transaction orchestration: routing, nonce-ordered batches, funding and
//! confirmation.
//!
//! Batches read the sender's pending nonce once and assign `base + i` in input
//! order. Sequential batches await each submission before issuing the next;
//! concurrent batches fan out and only guarantee nonce order.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::U256;
use futures::future::{join_all, try_join_all};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::Blockchain;
use crate::client::ExecuteLayerClient;
use crate::error::{Error, Result};
use crate::types::{TransactionReceipt, TransactionRequest, TransactionResult};
use crate::wallet::Wallet;

/// Confirmation timeout when neither the caller nor the network sets one.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Sleep between receipt lookups.
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Amount sent to each wallet by [`Blockchain::create_and_fund_wallets`]
/// (1 ether in wei).
pub const DEFAULT_FUNDING_AMOUNT: &str = "1000000000000000000";

const NOT_SUBMITTED: &str = "not submitted: an earlier funding transaction failed";

/// Funding result for one generated wallet.
#[derive(Debug, Clone)]
pub enum FundingOutcome {
    /// The funding transaction was submitted.
    Funded {
        /// The generated wallet.
        wallet: Wallet,
        /// Pending funding transaction.
        transaction: TransactionResult,
        /// 1-based position for display.
        display_index: usize,
    },
    /// The funding transaction was rejected or never submitted.
    Failed {
        /// The generated wallet.
        wallet: Wallet,
        /// 1-based position for display.
        display_index: usize,
        /// Failure description.
        error: String,
    },
}

impl FundingOutcome {
    /// The generated wallet.
    #[must_use]
    pub const fn wallet(&self) -> &Wallet {
        match self {
            Self::Funded { wallet, .. } | Self::Failed { wallet, .. } => wallet,
        }
    }

    /// 1-based position for display.
    #[must_use]
    pub const fn display_index(&self) -> usize {
        match self {
            Self::Funded { display_index, .. } | Self::Failed { display_index, .. } => {
                *display_index
            }
        }
    }

    /// Whether a funding transaction was submitted.
    #[must_use]
    pub const fn is_funded(&self) -> bool {
        matches!(self, Self::Funded { .. })
    }

    /// The funding transaction, if submitted.
    #[must_use]
    pub const fn transaction(&self) -> Option<&TransactionResult> {
        match self {
            Self::Funded { transaction, .. } => Some(transaction),
            Self::Failed { .. } => None,
        }
    }
}

/// Outcome of one confirmation wait in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationOutcome {
    /// Caller-supplied index.
    pub index: usize,
    /// Included and successful.
    pub success: bool,
    /// Inclusion block, when included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A transfer observed in a block by [`Blockchain::send_and_confirm`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedTransfer {
    /// Transaction hash.
    pub tx_hash: String,
    /// Inclusion block hash.
    pub block_hash: Option<String>,
    /// Inclusion block number.
    pub block_number: u64,
}

impl Blockchain {
    fn source_wallet<'a>(&'a self, from: Option<&'a Wallet>) -> Result<&'a Wallet> {
        from.or(self.founder_wallet.as_ref())
            .ok_or(Error::NoFounderWallet)
    }

    fn confirmation_timeout(&self, timeout: Option<Duration>) -> Duration {
        timeout
            .or(self.timeout)
            .unwrap_or(DEFAULT_CONFIRMATION_TIMEOUT)
    }

    /// Sign with `private_key` and submit through the resolved node.
    pub async fn send_transaction(
        &self,
        request: &TransactionRequest,
        private_key: &str,
        node: Option<u32>,
    ) -> Result<TransactionResult> {
        self.resolve_node(node)?
            .send_transaction(request, private_key)
            .await
    }

    /// Transfer `amount` base units to `to`, signed by `private_key` or the
    /// founder wallet.
    pub async fn send_simple_transaction(
        &self,
        to: &str,
        amount: &str,
        private_key: Option<&str>,
        node: Option<u32>,
    ) -> Result<TransactionResult> {
        let request = TransactionRequest::transfer(to, amount);
        let node = self.resolve_node(node)?;
        match private_key {
            Some(key) => node.send_transaction(&request, key).await,
            None => {
                node.send_transaction_from(&request, self.source_wallet(None)?)
                    .await
            }
        }
    }

    /// Read the base nonce and fees once and stamp them onto every request.
    async fn prepare_batch(
        &self,
        transactions: &[TransactionRequest],
        wallet: &Wallet,
        priority_fee_per_gas: Option<u128>,
    ) -> Result<(&Arc<dyn ExecuteLayerClient>, Vec<TransactionRequest>)> {
        let client = self.default_execute_layer_client()?;
        let sender = wallet.address();
        let base_nonce = client.transaction_count(&sender, true).await?;
        let fees = client.fee_data().await?;

        let prepared = transactions
            .iter()
            .zip(base_nonce..)
            .map(|(request, nonce)| {
                request
                    .clone()
                    .with_fees(&fees, priority_fee_per_gas)
                    .nonce(nonce)
            })
            .collect();

        debug!(
            sender = %sender,
            base_nonce,
            count = transactions.len(),
            "batch prepared",
        );
        Ok((client, prepared))
    }

    /// Submit in order, stopping at the first rejection.
    ///
    /// The returned list ends with that rejection; later requests are absent.
    async fn submit_sequential(
        client: &Arc<dyn ExecuteLayerClient>,
        wallet: &Wallet,
        prepared: &[TransactionRequest],
    ) -> Vec<Result<TransactionResult>> {
        let mut results = Vec::with_capacity(prepared.len());
        for request in prepared {
            let result = client.send_transaction(request, wallet).await;
            let failed = result.is_err();
            results.push(result);
            if failed {
                break;
            }
        }
        results
    }

    /// Send `transactions` from one sender with nonces `base + i`, awaiting
    /// each submission before the next.
    ///
    /// The first rejection aborts the call with [`Error::BatchSend`]; earlier
    /// transactions stay submitted.
    pub async fn send_multiple_transactions(
        &self,
        transactions: &[TransactionRequest],
        from: Option<&Wallet>,
        priority_fee_per_gas: Option<u128>,
    ) -> Result<Vec<TransactionResult>> {
        let wallet = self.source_wallet(from)?;
        let (client, prepared) = self
            .prepare_batch(transactions, wallet, priority_fee_per_gas)
            .await?;

        let results = Self::submit_sequential(client, wallet, &prepared)
            .await
            .into_iter()
            .enumerate()
            .map(|(index, result)| {
                result.map_err(|source| Error::BatchSend {
                    index,
                    source: Box::new(source),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(count = results.len(), "batch submitted");
        Ok(results)
    }

    /// Like [`Self::send_multiple_transactions`], with all submissions in
    /// flight at once. Any rejection fails the whole call.
    pub async fn send_multiple_transactions_concurrent(
        &self,
        transactions: &[TransactionRequest],
        from: Option<&Wallet>,
        priority_fee_per_gas: Option<u128>,
    ) -> Result<Vec<TransactionResult>> {
        let wallet = self.source_wallet(from)?;
        let (client, prepared) = self
            .prepare_batch(transactions, wallet, priority_fee_per_gas)
            .await?;

        let sends = prepared.iter().enumerate().map(|(index, request)| async move {
            client
                .send_transaction(request, wallet)
                .await
                .map_err(|source| Error::BatchSend {
                    index,
                    source: Box::new(source),
                })
        });
        let results = try_join_all(sends).await?;

        info!(count = results.len(), "concurrent batch submitted");
        Ok(results)
    }

    /// Generate `count` wallets and fund each from `from` (founder by default).
    ///
    /// Returns one outcome per wallet, in generation order. Funding is best
    /// effort; only wallet generation or a missing source wallet fail the call.
    pub async fn create_and_fund_wallets(
        &self,
        count: usize,
        funding_amount: Option<&str>,
        from: Option<&Wallet>,
    ) -> Result<Vec<FundingOutcome>> {
        let source = self.source_wallet(from)?;
        let amount = funding_amount.unwrap_or(DEFAULT_FUNDING_AMOUNT);
        let wallets = (0..count)
            .map(|_| self.create_wallet(None))
            .collect::<Result<Vec<_>>>()?;
        if wallets.is_empty() {
            return Ok(Vec::new());
        }

        let requests: Vec<_> = wallets
            .iter()
            .map(|wallet| TransactionRequest::transfer(wallet.address(), amount))
            .collect();
        let submitted = match self.prepare_batch(&requests, source, None).await {
            Ok((client, prepared)) => Self::submit_sequential(client, source, &prepared).await,
            Err(err) => vec![Err(err)],
        };

        let mut submitted = submitted.into_iter();
        let outcomes: Vec<_> = wallets
            .into_iter()
            .enumerate()
            .map(|(i, wallet)| {
                let display_index = i + 1;
                match submitted.next() {
                    Some(Ok(transaction)) => FundingOutcome::Funded {
                        wallet,
                        transaction,
                        display_index,
                    },
                    Some(Err(err)) => {
                        warn!(wallet = display_index, error = %err, "funding transaction failed");
                        FundingOutcome::Failed {
                            wallet,
                            display_index,
                            error: err.to_string(),
                        }
                    }
                    None => FundingOutcome::Failed {
                        wallet,
                        display_index,
                        error: NOT_SUBMITTED.to_owned(),
                    },
                }
            })
            .collect();

        let funded = outcomes.iter().filter(|o| o.is_funded()).count();
        info!(count, funded, amount, "wallets created");
        Ok(outcomes)
    }

    /// Wait until `hash` is included and `confirmations` blocks deep.
    ///
    /// Zero confirmations behave like one. Expiry fails with
    /// [`Error::Timeout`].
    pub async fn wait_for_transaction(
        &self,
        hash: &str,
        confirmations: u64,
        timeout: Option<Duration>,
    ) -> Result<TransactionReceipt> {
        let client = self.default_execute_layer_client()?;
        let timeout = self.confirmation_timeout(timeout);
        let depth = confirmations.max(1);

        tokio::time::timeout(timeout, self.poll_receipt(client, hash, depth))
            .await
            .map_err(|_| Error::timeout(format!("waiting for transaction {hash}"), timeout))?
    }

    async fn poll_receipt(
        &self,
        client: &Arc<dyn ExecuteLayerClient>,
        hash: &str,
        depth: u64,
    ) -> Result<TransactionReceipt> {
        loop {
            if let Some(receipt) = client.transaction_receipt(hash).await? {
                if depth == 1 {
                    return Ok(receipt);
                }
                let height = client.block_number().await?;
                if height.saturating_sub(receipt.block_number) + 1 >= depth {
                    return Ok(receipt);
                }
            }
            tokio::time::sleep(self.receipt_poll_interval).await;
        }
    }

    /// Wait for one confirmation of every `(index, hash)` pair concurrently.
    ///
    /// Each wait fails on its own; siblings keep waiting.
    pub async fn wait_for_transaction_confirmations<'a, I>(
        &self,
        transactions: I,
        timeout: Option<Duration>,
    ) -> Vec<ConfirmationOutcome>
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        let waits = transactions.into_iter().map(|(index, hash)| async move {
            match self.wait_for_transaction(hash, 1, timeout).await {
                Ok(receipt) if receipt.success => ConfirmationOutcome {
                    index,
                    success: true,
                    block_number: Some(receipt.block_number),
                    error: None,
                },
                Ok(receipt) => ConfirmationOutcome {
                    index,
                    success: false,
                    block_number: Some(receipt.block_number),
                    error: Some("transaction reverted".to_owned()),
                },
                Err(err) => {
                    debug!(index, hash, error = %err, "confirmation failed");
                    ConfirmationOutcome {
                        index,
                        success: false,
                        block_number: None,
                        error: Some(err.to_string()),
                    }
                }
            }
        });
        join_all(waits).await
    }

    /// Send a transfer and wait for its inclusion.
    ///
    /// Returns `None` on any failure, logging a warning.
    pub async fn send_and_confirm(
        &self,
        to: &str,
        amount: &str,
        private_key: Option<&str>,
    ) -> Option<ConfirmedTransfer> {
        let sent = match self
            .send_simple_transaction(to, amount, private_key, None)
            .await
        {
            Ok(sent) => sent,
            Err(err) => {
                warn!(to, error = %err, "transfer not submitted");
                return None;
            }
        };

        match self.wait_for_transaction(&sent.hash, 1, None).await {
            Ok(receipt) if receipt.success => Some(ConfirmedTransfer {
                tx_hash: sent.hash,
                block_hash: receipt.block_hash,
                block_number: receipt.block_number,
            }),
            Ok(_) => {
                warn!(hash = %sent.hash, "transfer reverted");
                None
            }
            Err(err) => {
                warn!(hash = %sent.hash, error = %err, "transfer not confirmed");
                None
            }
        }
    }

    /// Native balance of `address` seen by the resolved node.
    pub async fn wallet_balance(&self, address: &str, node: Option<u32>) -> Result<U256> {
        self.resolve_node(node)?
            .execute_client()?
            .balance(address)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::BlockchainNode;
    use crate::testing::{MockExecuteClient, hash_for_nonce};
    use crate::types::{ChainType, FeeData, NodeType, TxStatus};
    use crate::wallet::WalletFactory;

    const FOUNDER_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const FOUNDER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    fn chain_with(mock: Arc<MockExecuteClient>) -> Blockchain {
        Blockchain::builder("devnet")
            .node(BlockchainNode::builder(0, NodeType::Bootnode).build())
            .node(
                BlockchainNode::builder(1, NodeType::Validator)
                    .execute_client(mock)
                    .build(),
            )
            .founder_wallet(WalletFactory::create_wallet(ChainType::Evm, Some(FOUNDER_KEY)).unwrap())
            .build()
            .unwrap()
    }

    fn transfers(n: usize) -> Vec<TransactionRequest> {
        (0..n)
            .map(|i| TransactionRequest::transfer(RECIPIENT, (i + 1).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_sequential_batch_assigns_consecutive_nonces() {
        let mock = Arc::new(MockExecuteClient::new("http://a").with_pending_count(7));
        let chain = chain_with(mock.clone());

        let results = chain
            .send_multiple_transactions(&transfers(4), None, None)
            .await
            .unwrap();

        assert_eq!(mock.sent_nonces(), vec![7, 8, 9, 10]);
        let nonces: Vec<_> = results.iter().filter_map(|r| r.nonce).collect();
        assert_eq!(nonces, vec![7, 8, 9, 10]);
        // Amounts prove input order was kept.
        let amounts: Vec<_> = mock.sent().into_iter().map(|(_, tx)| tx.amount).collect();
        assert_eq!(amounts, vec!["1", "2", "3", "4"]);
        assert!(mock.sent().iter().all(|(from, _)| from == FOUNDER));
    }

    #[tokio::test]
    async fn test_batch_fees_prefer_eip1559_with_priority_override() {
        let mock = Arc::new(MockExecuteClient::new("http://a"));
        let chain = chain_with(mock.clone());

        chain
            .send_multiple_transactions(&transfers(2), None, Some(5))
            .await
            .unwrap();
        for (_, tx) in mock.sent() {
            assert_eq!(tx.max_fee_per_gas, Some(2_000_000_000));
            assert_eq!(tx.max_priority_fee_per_gas, Some(5));
            assert_eq!(tx.gas_price, None);
        }
    }

    #[tokio::test]
    async fn test_batch_fees_fall_back_to_legacy() {
        let mock = Arc::new(MockExecuteClient::new("http://a").with_fees(FeeData {
            gas_price: Some(42),
            ..FeeData::default()
        }));
        let chain = chain_with(mock.clone());

        chain
            .send_multiple_transactions(&transfers(2), None, Some(5))
            .await
            .unwrap();
        for (_, tx) in mock.sent() {
            assert_eq!(tx.gas_price, Some(42));
            assert_eq!(tx.max_fee_per_gas, None);
        }
    }

    #[tokio::test]
    async fn test_sequential_batch_aborts_on_failure() {
        let mock = Arc::new(MockExecuteClient::new("http://a").failing_at(1));
        let chain = chain_with(mock.clone());

        let err = chain
            .send_multiple_transactions(&transfers(3), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BatchSend { index: 1, .. }));
        // The first transaction stays submitted, the third is never sent.
        assert_eq!(mock.sent_nonces(), vec![0]);
    }

    #[tokio::test]
    async fn test_concurrent_batch_keeps_nonce_order() {
        let mock = Arc::new(MockExecuteClient::new("http://a").with_pending_count(3));
        let chain = chain_with(mock.clone());

        let results = chain
            .send_multiple_transactions_concurrent(&transfers(5), None, None)
            .await
            .unwrap();
        let nonces: Vec<_> = results.iter().filter_map(|r| r.nonce).collect();
        assert_eq!(nonces, vec![3, 4, 5, 6, 7]);

        let mut sent = mock.sent_nonces();
        sent.sort_unstable();
        assert_eq!(sent, vec![3, 4, 5, 6, 7]);
    }

    #[tokio::test]
    async fn test_concurrent_batch_is_all_or_nothing() {
        let mock = Arc::new(MockExecuteClient::new("http://a").failing_at(2));
        let chain = chain_with(mock);
        assert!(chain
            .send_multiple_transactions_concurrent(&transfers(4), None, None)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_batch_without_source_wallet() {
        let chain = Blockchain::builder("devnet")
            .node(
                BlockchainNode::builder(0, NodeType::Validator)
                    .execute_client(Arc::new(MockExecuteClient::new("http://a")))
                    .build(),
            )
            .build()
            .unwrap();
        assert!(matches!(
            chain.send_multiple_transactions(&transfers(1), None, None).await,
            Err(Error::NoFounderWallet)
        ));
    }

    #[tokio::test]
    async fn test_create_and_fund_wallets_reports_each_wallet() {
        let mock = Arc::new(MockExecuteClient::new("http://a").failing_at(2));
        let chain = chain_with(mock.clone());

        let outcomes = chain
            .create_and_fund_wallets(4, Some("500"), None)
            .await
            .unwrap();
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes[0].is_funded());
        assert!(outcomes[1].is_funded());
        assert!(!outcomes[2].is_funded());
        let FundingOutcome::Failed { error, .. } = &outcomes[3] else {
            panic!("expected a failed outcome");
        };
        assert_eq!(error, NOT_SUBMITTED);

        let indices: Vec<_> = outcomes.iter().map(FundingOutcome::display_index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);

        let funded_to: Vec<_> = mock.sent().into_iter().map(|(_, tx)| tx.to).collect();
        assert_eq!(funded_to[0], outcomes[0].wallet().address());
        assert_eq!(outcomes[1].transaction().unwrap().to, outcomes[1].wallet().address());
    }

    #[tokio::test]
    async fn test_create_and_fund_wallets_without_execute_client() {
        let chain = Blockchain::builder("devnet")
            .node(BlockchainNode::builder(0, NodeType::Validator).build())
            .founder_wallet(WalletFactory::create_wallet(ChainType::Evm, Some(FOUNDER_KEY)).unwrap())
            .build()
            .unwrap();
        let outcomes = chain.create_and_fund_wallets(2, None, None).await.unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| !o.is_funded()));
    }

    #[tokio::test]
    async fn test_send_simple_transaction_defaults_to_founder() {
        let mock = Arc::new(MockExecuteClient::new("http://a"));
        let chain = chain_with(mock.clone());
        let result = chain
            .send_simple_transaction(RECIPIENT, "10", None, None)
            .await
            .unwrap();
        assert_eq!(result.from, FOUNDER);
        assert_eq!(result.status, TxStatus::Pending);
    }

    #[tokio::test]
    async fn test_send_transaction_routes_to_explicit_node() {
        let chain = chain_with(Arc::new(MockExecuteClient::new("http://a")));
        let request = TransactionRequest::transfer(RECIPIENT, "1");
        // Node 0 is a bootnode without clients.
        assert!(chain.send_transaction(&request, FOUNDER_KEY, Some(0)).await.is_err());
        assert!(chain.send_transaction(&request, FOUNDER_KEY, None).await.is_ok());
        assert!(matches!(
            chain.send_transaction(&request, FOUNDER_KEY, Some(9)).await,
            Err(Error::NodeNotFound(9))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmations_are_isolated_per_item() {
        let mock = Arc::new(MockExecuteClient::new("http://a"));
        let stuck = hash_for_nonce(1);
        mock.leave_unmined(&stuck);
        let chain = chain_with(mock);

        let mined = hash_for_nonce(0);
        let outcomes = chain
            .wait_for_transaction_confirmations(
                [(1, mined.as_str()), (2, stuck.as_str())],
                Some(Duration::from_secs(5)),
            )
            .await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].index, 1);
        assert!(outcomes[0].success);
        assert_eq!(outcomes[0].block_number, Some(100));
        assert_eq!(outcomes[1].index, 2);
        assert!(!outcomes[1].success);
        assert!(outcomes[1].error.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_transaction_needs_depth() {
        let mock = Arc::new(MockExecuteClient::new("http://a").advancing(1));
        let chain = chain_with(mock);
        let receipt = chain
            .wait_for_transaction(&hash_for_nonce(0), 3, None)
            .await
            .unwrap();
        assert_eq!(receipt.block_number, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_and_confirm_never_mined_returns_none() {
        let mock = Arc::new(MockExecuteClient::new("http://a").never_mines());
        let chain = chain_with(mock);
        assert!(chain.send_and_confirm(RECIPIENT, "1", None).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_timeout_prefers_network_timeout() {
        let mock = Arc::new(MockExecuteClient::new("http://a").never_mines());
        let mut chain = chain_with(mock);
        chain.set_timeout(Some(Duration::from_secs(2)));
        let err = chain
            .wait_for_transaction(&hash_for_nonce(0), 1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { after, .. } if after == Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_send_and_confirm_returns_inclusion() {
        let chain = chain_with(Arc::new(MockExecuteClient::new("http://a").with_height(55)));
        let confirmed = chain
            .send_and_confirm(RECIPIENT, "1", Some(FOUNDER_KEY))
            .await
            .unwrap();
        assert_eq!(confirmed.tx_hash, hash_for_nonce(0));
        assert_eq!(confirmed.block_number, 55);
    }

    #[tokio::test]
    async fn test_wallet_balance() {
        let chain = chain_with(Arc::new(MockExecuteClient::new("http://a")));
        let balance = chain.wallet_balance(FOUNDER, None).await.unwrap();
        assert_eq!(balance, U256::from(5_000_000_000_000_000_000_u128));
        assert!(chain.wallet_balance(FOUNDER, Some(0)).await.unwrap_err().is_no_client());
    }
}
