//! Minimal JSON-RPC client, just enough to ask a node for `eth_chainId`.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::SdkError;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: [(); 0],
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Ask the node at `rpc_url` which chain it serves.
pub async fn resolve_chain_id(client: &Client, rpc_url: &str) -> Result<u64, SdkError> {
    let request = RpcRequest {
        jsonrpc: "2.0",
        id: 1,
        method: "eth_chainId",
        params: [],
    };

    tracing::debug!("Resolving chain id from {}", rpc_url);

    let resp = client
        .post(rpc_url)
        .json(&request)
        .send()
        .await
        .map_err(|e| SdkError::ChainResolution(format!("{}: {}", rpc_url, e)))?;

    let status = resp.status();
    if !status.is_success() {
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => format!("<failed to read body: {}>", e),
        };
        return Err(SdkError::ChainResolution(format!(
            "RPC returned status {}: {}",
            status.as_u16(),
            body
        )));
    }

    let parsed: RpcResponse = resp
        .json()
        .await
        .map_err(|e| SdkError::ChainResolution(format!("invalid RPC response: {}", e)))?;

    if let Some(err) = parsed.error {
        return Err(SdkError::ChainResolution(format!(
            "RPC error {}: {}",
            err.code, err.message
        )));
    }

    let result = parsed
        .result
        .ok_or_else(|| SdkError::ChainResolution("RPC response has no result".to_string()))?;
    let chain_id = parse_quantity(&result)?;
    tracing::debug!(chain_id, "Resolved chain id");
    Ok(chain_id)
}

/// Parse a JSON-RPC quantity (`0x`-prefixed hex, no leading zeros required).
fn parse_quantity(s: &str) -> Result<u64, SdkError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| SdkError::ChainResolution(format!("chain id is not hex: {}", s)))?;
    if digits.is_empty() {
        return Err(SdkError::ChainResolution(format!("empty chain id: {}", s)));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| SdkError::ChainResolution(format!("invalid chain id {}: {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x1").unwrap(), 1);
        assert_eq!(parse_quantity("0xaa36a7").unwrap(), 11_155_111);
        assert!(parse_quantity("1").is_err());
        assert!(parse_quantity("0x").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn test_request_shape() {
        let req = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "eth_chainId",
            params: [],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"jsonrpc": "2.0", "id": 1, "method": "eth_chainId", "params": []})
        );
    }

    #[tokio::test]
    async fn test_resolves_chain_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"method": "eth_chainId"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"jsonrpc": "2.0", "id": 1, "result": "0x64"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let id = resolve_chain_id(&Client::new(), &server.uri()).await.unwrap();
        assert_eq!(id, 100);
    }

    #[tokio::test]
    async fn test_rpc_error_object_is_chain_resolution_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32601, "message": "method not found"}
            })))
            .mount(&server)
            .await;

        let err = resolve_chain_id(&Client::new(), &server.uri())
            .await
            .unwrap_err();
        match err {
            SdkError::ChainResolution(msg) => assert!(msg.contains("method not found")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_error_status_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let err = resolve_chain_id(&Client::new(), &server.uri())
            .await
            .unwrap_err();
        match err {
            SdkError::ChainResolution(msg) => {
                assert!(msg.contains("502"));
                assert!(msg.contains("upstream unavailable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_node_is_chain_resolution_error() {
        let err = resolve_chain_id(&Client::new(), "http://127.0.0.1:1")
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::ChainResolution(_)));
    }
}
