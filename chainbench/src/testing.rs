//! In-memory layer clients for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use alloy::primitives::U256;
use async_trait::async_trait;
use serde_json::{Value, json};

use crate::client::{ConsensusLayerClient, ExecuteLayerClient};
use crate::error::{Error, Result};
use crate::types::{
    ChainType, FeeData, Layer, TransactionReceipt, TransactionRequest, TransactionResult, TxStatus,
};
use crate::wallet::Wallet;

/// Scripted execution-layer endpoint.
///
/// Heights advance by `step` on every `block_number` call. Sends are recorded
/// in order of arrival; hashes encode the nonce. A transaction is mined at the
/// height current when its receipt is first requested.
#[derive(Debug)]
pub(crate) struct MockExecuteClient {
    url: String,
    reachable: AtomicBool,
    height: AtomicU64,
    step: u64,
    pending_count: u64,
    fees: FeeData,
    fail_at: Option<usize>,
    mines: bool,
    unmined: Mutex<HashSet<String>>,
    mined_at: Mutex<HashMap<String, u64>>,
    sends: AtomicUsize,
    sent: Mutex<Vec<(String, TransactionRequest)>>,
    balance: U256,
}

impl MockExecuteClient {
    pub(crate) fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            reachable: AtomicBool::new(true),
            height: AtomicU64::new(100),
            step: 0,
            pending_count: 0,
            fees: FeeData {
                gas_price: Some(1_000_000_000),
                max_fee_per_gas: Some(2_000_000_000),
                max_priority_fee_per_gas: Some(1_000_000),
            },
            fail_at: None,
            mines: true,
            unmined: Mutex::new(HashSet::new()),
            mined_at: Mutex::new(HashMap::new()),
            sends: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            balance: U256::from(5_000_000_000_000_000_000_u128),
        }
    }

    pub(crate) fn with_height(self, height: u64) -> Self {
        self.height.store(height, Ordering::SeqCst);
        self
    }

    pub(crate) const fn advancing(mut self, step: u64) -> Self {
        self.step = step;
        self
    }

    pub(crate) const fn with_pending_count(mut self, count: u64) -> Self {
        self.pending_count = count;
        self
    }

    pub(crate) const fn with_fees(mut self, fees: FeeData) -> Self {
        self.fees = fees;
        self
    }

    /// The `index`-th submission (zero-based, arrival order) is rejected.
    pub(crate) const fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub(crate) const fn never_mines(mut self) -> Self {
        self.mines = false;
        self
    }

    pub(crate) fn unreachable(self) -> Self {
        self.reachable.store(false, Ordering::SeqCst);
        self
    }

    pub(crate) fn leave_unmined(&self, hash: &str) {
        self.unmined
            .lock()
            .expect("unmined lock")
            .insert(hash.to_owned());
    }

    /// Requests in arrival order, with the sender address.
    pub(crate) fn sent(&self) -> Vec<(String, TransactionRequest)> {
        self.sent.lock().expect("sent lock").clone()
    }

    pub(crate) fn sent_nonces(&self) -> Vec<u64> {
        self.sent()
            .iter()
            .filter_map(|(_, tx)| tx.nonce)
            .collect()
    }

    fn check_reachable(&self) -> Result<()> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::unavailable(format!("{}: connection refused", self.url)))
        }
    }
}

pub(crate) fn hash_for_nonce(nonce: u64) -> String {
    format!("0x{nonce:064x}")
}

#[async_trait]
impl ExecuteLayerClient for MockExecuteClient {
    fn chain_type(&self) -> ChainType {
        ChainType::Evm
    }

    fn rpc_url(&self) -> &str {
        &self.url
    }

    async fn test_connection(&self) -> Result<bool> {
        self.check_reachable().map(|()| true)
    }

    async fn block_number(&self) -> Result<u64> {
        self.check_reachable()?;
        Ok(self.height.fetch_add(self.step, Ordering::SeqCst))
    }

    async fn chain_id(&self) -> Result<u64> {
        self.check_reachable()?;
        Ok(9000)
    }

    async fn transaction_count(&self, _address: &str, pending: bool) -> Result<u64> {
        self.check_reachable()?;
        Ok(if pending { self.pending_count } else { 0 })
    }

    async fn balance(&self, _address: &str) -> Result<U256> {
        self.check_reachable()?;
        Ok(self.balance)
    }

    async fn fee_data(&self) -> Result<FeeData> {
        self.check_reachable()?;
        Ok(self.fees)
    }

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
        wallet: &Wallet,
    ) -> Result<TransactionResult> {
        self.check_reachable()?;
        let signer = wallet.evm_signer()?;
        let position = self.sends.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(position) {
            return Err(Error::Rpc {
                code: -32000,
                message: "replacement transaction underpriced".into(),
            });
        }
        let nonce = request.nonce.unwrap_or(self.pending_count);
        let from = signer.address().to_checksum(None);
        self.sent
            .lock()
            .expect("sent lock")
            .push((from.clone(), request.clone()));
        Ok(TransactionResult {
            hash: hash_for_nonce(nonce),
            status: TxStatus::Pending,
            from,
            to: request.to.clone(),
            nonce: Some(nonce),
            block_number: None,
            block_hash: None,
            gas_used: None,
        })
    }

    async fn transaction_receipt(&self, hash: &str) -> Result<Option<TransactionReceipt>> {
        self.check_reachable()?;
        if !self.mines || self.unmined.lock().expect("unmined lock").contains(hash) {
            return Ok(None);
        }
        let block_number = *self
            .mined_at
            .lock()
            .expect("mined_at lock")
            .entry(hash.to_owned())
            .or_insert_with(|| self.height.load(Ordering::SeqCst));
        Ok(Some(TransactionReceipt {
            hash: hash.to_owned(),
            block_number,
            block_hash: Some(format!("0x{:064x}", 0xb10c_u64)),
            gas_used: 21_000,
            success: true,
        }))
    }

    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value> {
        self.check_reachable()?;
        Ok(json!({ "url": self.url, "method": method, "params": params }))
    }
}

/// Scripted consensus-layer endpoint.
#[derive(Debug)]
pub(crate) struct MockConsensusClient {
    url: String,
    layer: Layer,
    reachable: AtomicBool,
    height: AtomicU64,
}

impl MockConsensusClient {
    pub(crate) fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            layer: Layer::Consensus,
            reachable: AtomicBool::new(true),
            height: AtomicU64::new(100),
        }
    }

    pub(crate) fn rest(url: &str) -> Self {
        Self {
            layer: Layer::Rest,
            ..Self::new(url)
        }
    }

    pub(crate) fn with_height(self, height: u64) -> Self {
        self.height.store(height, Ordering::SeqCst);
        self
    }

    pub(crate) fn unreachable(self) -> Self {
        self.reachable.store(false, Ordering::SeqCst);
        self
    }

    fn check_reachable(&self) -> Result<()> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::unavailable(format!("{}: connection refused", self.url)))
        }
    }
}

#[async_trait]
impl ConsensusLayerClient for MockConsensusClient {
    fn layer(&self) -> Layer {
        self.layer
    }

    fn rpc_url(&self) -> &str {
        &self.url
    }

    async fn test_connection(&self) -> Result<bool> {
        self.check_reachable().map(|()| true)
    }

    async fn block_height(&self) -> Result<u64> {
        self.check_reachable()?;
        Ok(self.height.load(Ordering::SeqCst))
    }

    async fn rpc_call(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        self.check_reachable()?;
        let params: serde_json::Map<String, Value> = params
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Ok(json!({ "url": self.url, "path": path, "params": params }))
    }
}
