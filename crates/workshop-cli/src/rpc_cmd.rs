use anyhow::Context;
use reqwest::Client;
use serde_json::Value;

use workshop_mcp::{JsonRpcRequest, JsonRpcResponse};

/// Minimal JSON-RPC client for a running tool server.
pub struct RpcClient {
    client: Client,
    endpoint: String,
}

impl RpcClient {
    pub fn new(server_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/mcp", server_url.trim_end_matches('/')),
        }
    }

    /// Send one request and return its `result`.
    ///
    /// JSON-RPC errors become `Err`, so the process exits non-zero.
    pub async fn call(&self, method: &str, params: Option<Value>) -> anyhow::Result<Value> {
        let request = JsonRpcRequest::new(1, method, params);
        tracing::debug!(endpoint = %self.endpoint, method, "sending request");

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.endpoint))?;

        let status = resp.status();
        let body: JsonRpcResponse = resp
            .json()
            .await
            .with_context(|| format!("server answered {status} without a JSON-RPC body"))?;

        if let Some(error) = body.error {
            anyhow::bail!("{} (code {})", error.message, error.code);
        }
        Ok(body.result.unwrap_or(Value::Null))
    }
}

/// Parse `--args` of `call`: a JSON object, `{}` when absent.
pub fn parse_arguments(raw: Option<&str>) -> anyhow::Result<Value> {
    let Some(raw) = raw else {
        return Ok(Value::Object(serde_json::Map::new()));
    };

    let value: Value = serde_json::from_str(raw).context("--args is not valid JSON")?;
    if !value.is_object() {
        anyhow::bail!("--args must be a JSON object, got {value}");
    }
    Ok(value)
}

/// Print a `tools/call` result: text blocks verbatim, other blocks as JSON.
pub fn print_tool_result(result: &Value) -> anyhow::Result<()> {
    let Some(blocks) = result.get("content").and_then(Value::as_array) else {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    };

    for block in blocks {
        match block.get("text").and_then(Value::as_str) {
            Some(text) if block["type"] == "text" => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(block)?),
        }
    }
    Ok(())
}
