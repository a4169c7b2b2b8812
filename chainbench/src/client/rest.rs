//! Cosmos SDK REST (gRPC-gateway) client.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{ConsensusLayerClient, HttpClientConfig, endpoint, parse_height, parse_url, rpc_error};
use crate::error::{Error, Result};
use crate::types::Layer;

const NODE_INFO_PATH: &str = "/cosmos/base/tendermint/v1beta1/node_info";
const LATEST_BLOCK_PATH: &str = "/cosmos/base/tendermint/v1beta1/blocks/latest";

/// Client for a Cosmos SDK REST API. Bodies are returned as-is.
#[derive(Clone)]
pub struct CosmosRestClient {
    http_client: reqwest::Client,
    base_url: Url,
    url: String,
}

impl fmt::Debug for CosmosRestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmosRestClient")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl CosmosRestClient {
    /// Create a client for the REST API at `url`.
    pub fn connect(url: &str, config: &HttpClientConfig) -> Result<Self> {
        Ok(Self {
            http_client: config.build_client()?,
            base_url: parse_url(url)?,
            url: url.to_owned(),
        })
    }
}

/// Height of a `blocks/latest` body; SDK 0.47+ also carries `sdk_block`.
fn latest_height(body: &Value) -> Result<u64> {
    let height = ["sdk_block", "block"]
        .iter()
        .map(|key| &body[*key]["header"]["height"])
        .find(|h| !h.is_null())
        .unwrap_or(&Value::Null);
    parse_height(height, "block.header.height")
}

#[async_trait]
impl ConsensusLayerClient for CosmosRestClient {
    fn layer(&self) -> Layer {
        Layer::Rest
    }

    fn rpc_url(&self) -> &str {
        &self.url
    }

    async fn test_connection(&self) -> Result<bool> {
        self.rpc_call(NODE_INFO_PATH, &[]).await.map(|_| true)
    }

    async fn block_height(&self) -> Result<u64> {
        latest_height(&self.rpc_call(LATEST_BLOCK_PATH, &[]).await?)
    }

    async fn rpc_call(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        let url = endpoint(&self.base_url, path, params)?;
        debug!(url = %url, "rest call");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::unavailable(format!("{}: {e}", self.url)))?;
        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<Value>(&text) {
            Ok(body) if status.is_success() => Ok(body),
            // gRPC-gateway errors: { "code": 3, "message": "...", "details": [] }
            Ok(body) if body.get("message").is_some() => Err(rpc_error(&body)),
            _ => Err(Error::unavailable(format!(
                "{} returned HTTP {status}: {text}",
                self.url
            ))),
        }
    }
}
