//! HTTP client configuration and endpoint helpers for the layer clients.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default EVM JSON-RPC port.
pub const DEFAULT_EVM_RPC_PORT: u16 = 8545;

/// Default CometBFT / Tendermint RPC port.
pub const DEFAULT_COMETBFT_RPC_PORT: u16 = 26657;

/// Default Cosmos SDK REST API port.
pub const DEFAULT_COSMOS_REST_PORT: u16 = 1317;

/// Shared HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpClientConfig {
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// User agent string.
    pub user_agent: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Some(30),
            user_agent: Some(concat!("chainbench/", env!("CARGO_PKG_VERSION")).to_owned()),
        }
    }
}

impl HttpClientConfig {
    /// Build a reqwest client with this configuration.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        if let Some(ref user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(builder.build()?)
    }
}

/// Parse a base URL, reporting the offending string on failure.
pub(crate) fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| Error::invalid_config(format!("invalid url '{url}': {e}")))
}

/// Join `path` onto `base` and append query pairs.
pub(crate) fn endpoint(base: &Url, path: &str, params: &[(String, String)]) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = parse_url(&joined)?;
    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    Ok(url)
}

/// `base` with its port replaced.
pub(crate) fn with_port(base: &str, port: u16) -> Result<String> {
    let mut url = parse_url(base)?;
    url.set_port(Some(port))
        .map_err(|()| Error::invalid_config(format!("url '{base}' cannot carry a port")))?;
    Ok(url.as_str().trim_end_matches('/').to_owned())
}
