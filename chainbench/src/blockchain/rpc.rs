//! Generic RPC dispatch through nodes or public endpoints.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use super::Blockchain;
use crate::error::{Error, Result};
use crate::types::{RpcRequest, RpcSchemas};

/// Checks a request/response pair against caller-supplied schemas.
pub trait RpcValidator: Send + Sync + fmt::Debug {
    /// Validate `response` to `request`. Failures should be
    /// [`Error::Validation`]; any other error is converted to one.
    fn validate(&self, request: &Value, response: &Value, schemas: &RpcSchemas) -> Result<()>;
}

impl Blockchain {
    /// Run the installed validator when the caller passed schemas.
    fn check_response(
        &self,
        request: &RpcRequest,
        response: &Value,
        schemas: Option<&RpcSchemas>,
    ) -> Result<()> {
        let (Some(validator), Some(schemas)) = (self.validator.as_ref(), schemas) else {
            return Ok(());
        };
        let request = serde_json::to_value(request)?;
        validator
            .validate(&request, response, schemas)
            .map_err(|err| match err {
                Error::Validation(_) => err,
                other => Error::Validation(other.to_string()),
            })
    }

    /// Execution-layer JSON-RPC call through the resolved node.
    pub async fn make_rpc_call(
        &self,
        method: &str,
        params: Value,
        node: Option<u32>,
        schemas: Option<&RpcSchemas>,
    ) -> Result<Value> {
        let node = self.resolve_node(node)?;
        debug!(node = node.index(), method, "rpc call");
        let request = RpcRequest::new(method, params.clone());
        let response = node.rpc_call(method, params).await?;
        self.check_response(&request, &response, schemas)?;
        Ok(response)
    }

    /// Consensus-layer path call through the resolved node.
    pub async fn make_consensus_rpc_call(
        &self,
        path: &str,
        params: &[(String, String)],
        node: Option<u32>,
        schemas: Option<&RpcSchemas>,
    ) -> Result<Value> {
        let node = self.resolve_node(node)?;
        debug!(node = node.index(), path, "consensus rpc call");
        let response = node.consensus_rpc_call(path, params).await?;
        self.check_response(&RpcRequest::consensus(path, params), &response, schemas)?;
        Ok(response)
    }

    /// Execution-layer JSON-RPC call against `executeLayerHttpRpcUrl`.
    pub async fn make_rpc_call_via_public_endpoint(
        &self,
        method: &str,
        params: Value,
        schemas: Option<&RpcSchemas>,
    ) -> Result<Value> {
        let client = self.public_execute_layer_client()?;
        debug!(url = client.rpc_url(), method, "public rpc call");
        let request = RpcRequest::new(method, params.clone());
        let response = client.rpc_call(method, params).await?;
        self.check_response(&request, &response, schemas)?;
        Ok(response)
    }

    /// Consensus-layer path call against `consensusLayerRpcUrl`.
    pub async fn make_consensus_rpc_call_via_public_endpoint(
        &self,
        path: &str,
        params: &[(String, String)],
        schemas: Option<&RpcSchemas>,
    ) -> Result<Value> {
        let client = self.public_consensus_layer_client()?;
        debug!(url = client.rpc_url(), path, "public consensus rpc call");
        let response = client.rpc_call(path, params).await?;
        self.check_response(&RpcRequest::consensus(path, params), &response, schemas)?;
        Ok(response)
    }

    /// REST call against `consensusLayerHttpRestApiUrl`.
    pub async fn make_rest_call_via_public_endpoint(
        &self,
        path: &str,
        params: &[(String, String)],
        schemas: Option<&RpcSchemas>,
    ) -> Result<Value> {
        let client = self.public_rest_client()?;
        debug!(url = client.rpc_url(), path, "public rest call");
        let response = client.rpc_call(path, params).await?;
        self.check_response(&RpcRequest::consensus(path, params), &response, schemas)?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::node::BlockchainNode;
    use crate::testing::{MockConsensusClient, MockExecuteClient};
    use crate::types::{Layer, NodeType};

    /// Requires every key listed in the response schema's `required`.
    #[derive(Debug)]
    struct RequiredKeys;

    impl RpcValidator for RequiredKeys {
        fn validate(&self, _request: &Value, response: &Value, schemas: &RpcSchemas) -> Result<()> {
            let required = schemas
                .response
                .as_ref()
                .and_then(|schema| schema["required"].as_array())
                .cloned()
                .unwrap_or_default();
            for key in required.iter().filter_map(Value::as_str) {
                if response.get(key).is_none() {
                    return Err(Error::Validation(format!("missing '{key}'")));
                }
            }
            Ok(())
        }
    }

    fn chain() -> Blockchain {
        let node = |index: u32| {
            BlockchainNode::builder(index, NodeType::Validator)
                .execute_client(Arc::new(MockExecuteClient::new(&format!("http://node-{index}"))))
                .consensus_client(Arc::new(MockConsensusClient::new(&format!("http://node-{index}"))))
                .build()
        };
        Blockchain::builder("devnet")
            .node(node(0))
            .node(node(1))
            .public_execute_client(Arc::new(MockExecuteClient::new("http://public")))
            .public_rest_client(Arc::new(MockConsensusClient::rest("http://rest")))
            .validator(Arc::new(RequiredKeys))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_explicit_node_wins() {
        let chain = chain();
        let default = chain
            .make_rpc_call("eth_blockNumber", json!([]), None, None)
            .await
            .unwrap();
        assert_eq!(default["url"], "http://node-0");

        let explicit = chain
            .make_rpc_call("eth_blockNumber", json!([]), Some(1), None)
            .await
            .unwrap();
        assert_eq!(explicit["url"], "http://node-1");

        let consensus = chain
            .make_consensus_rpc_call("block", &[("height".into(), "5".into())], Some(1), None)
            .await
            .unwrap();
        assert_eq!(consensus["url"], "http://node-1");
        assert_eq!(consensus["params"]["height"], "5");
    }

    #[tokio::test]
    async fn test_public_endpoints_bypass_nodes() {
        let mut chain = chain();
        chain.deactivate_node(0).unwrap();
        chain.deactivate_node(1).unwrap();

        let value = chain
            .make_rpc_call_via_public_endpoint("eth_chainId", json!([]), None)
            .await
            .unwrap();
        assert_eq!(value["url"], "http://public");

        let value = chain
            .make_rest_call_via_public_endpoint("/cosmos/bank/v1beta1/supply", &[], None)
            .await
            .unwrap();
        assert_eq!(value["url"], "http://rest");

        assert!(matches!(
            chain
                .make_consensus_rpc_call_via_public_endpoint("status", &[], None)
                .await,
            Err(Error::PublicEndpointNotConfigured(Layer::Consensus))
        ));
    }

    #[tokio::test]
    async fn test_schemas_are_validated_when_given() {
        let chain = chain();
        let schemas = RpcSchemas {
            request: None,
            response: Some(json!({ "required": ["method", "result"] })),
        };

        let err = chain
            .make_rpc_call("eth_blockNumber", json!([]), None, Some(&schemas))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // Without schemas the validator is not consulted.
        assert!(chain
            .make_rpc_call("eth_blockNumber", json!([]), None, None)
            .await
            .is_ok());
    }
}
