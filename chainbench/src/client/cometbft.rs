//! CometBFT / Tendermint RPC client (URI-over-HTTP GET flavor).

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{ConsensusLayerClient, HttpClientConfig, endpoint, parse_height, parse_url, rpc_error};
use crate::error::{Error, Result};
use crate::types::Layer;

/// Client for a CometBFT RPC endpoint.
///
/// Every call is `GET {base}/{path}?{params}` and the `result` member of the
/// `{jsonrpc, id, result}` envelope is returned.
#[derive(Clone)]
pub struct CometBftConsensusClient {
    http_client: reqwest::Client,
    base_url: Url,
    url: String,
}

impl fmt::Debug for CometBftConsensusClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CometBftConsensusClient")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl CometBftConsensusClient {
    /// Create a client for the RPC endpoint at `url`.
    pub fn connect(url: &str, config: &HttpClientConfig) -> Result<Self> {
        Ok(Self {
            http_client: config.build_client()?,
            base_url: parse_url(url)?,
            url: url.to_owned(),
        })
    }

    /// Fetch the `/validators` page at `height`.
    pub async fn validators(&self, height: Option<u64>, page: u32, per_page: u32) -> Result<Value> {
        self.rpc_call("validators", &validators_query(height, page, per_page))
            .await
    }

    /// Fetch the block at `height`, or the latest one.
    pub async fn block(&self, height: Option<u64>) -> Result<Value> {
        self.rpc_call("block", &height_query(height)).await
    }
}

fn height_query(height: Option<u64>) -> Vec<(String, String)> {
    height
        .map(|h| vec![("height".to_owned(), h.to_string())])
        .unwrap_or_default()
}

fn validators_query(height: Option<u64>, page: u32, per_page: u32) -> Vec<(String, String)> {
    let mut params = height_query(height);
    params.push(("page".to_owned(), page.to_string()));
    params.push(("per_page".to_owned(), per_page.to_string()));
    params
}

/// Unwrap a CometBFT JSON-RPC envelope.
fn unwrap_envelope(body: Value) -> Result<Value> {
    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        return Err(rpc_error(error));
    }
    match body {
        Value::Object(mut map) => map
            .remove("result")
            .ok_or_else(|| Error::unavailable("response has neither result nor error")),
        other => Err(Error::unavailable(format!("unexpected response body: {other}"))),
    }
}

#[async_trait]
impl ConsensusLayerClient for CometBftConsensusClient {
    fn layer(&self) -> Layer {
        Layer::Consensus
    }

    fn rpc_url(&self) -> &str {
        &self.url
    }

    async fn test_connection(&self) -> Result<bool> {
        self.rpc_call("health", &[]).await.map(|_| true)
    }

    async fn block_height(&self) -> Result<u64> {
        let status = self.rpc_call("status", &[]).await?;
        parse_height(
            &status["sync_info"]["latest_block_height"],
            "latest_block_height",
        )
    }

    async fn rpc_call(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        let url = endpoint(&self.base_url, path, params)?;
        debug!(url = %url, "consensus rpc call");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::unavailable(format!("{}: {e}", self.url)))?;
        let status = response.status();
        let text = response.text().await?;

        // CometBFT reports RPC errors with a 500 and a JSON-RPC error body.
        match serde_json::from_str::<Value>(&text) {
            Ok(body) if body.get("error").is_some_and(|e| !e.is_null()) => unwrap_envelope(body),
            Ok(body) if status.is_success() => unwrap_envelope(body),
            _ => Err(Error::unavailable(format!(
                "{} returned HTTP {status}: {text}",
                self.url
            ))),
        }
    }
}
