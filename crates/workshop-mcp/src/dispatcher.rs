//! JSON-RPC request routing shared by every server variant.
//!
//! A [`Dispatcher`] is built once per server from an injected tool registry,
//! an optional resource catalog and an observer. It is immutable afterwards
//! and can serve any number of concurrent requests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::args::Arguments;
use crate::content::{CallToolResult, ToolOutput};
use crate::error::McpError;
use crate::jsonrpc::{JsonRpcResponse, INVALID_REQUEST};
use crate::observer::{ToolEvent, ToolObserver, TracingObserver};
use crate::resources::ResourceCatalog;
use crate::tools::{Tool, ToolRegistry};

/// The only protocol version spoken.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// `serverInfo` returned by `initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

/// Outcome of dispatching one request.
#[derive(Debug, Clone)]
pub enum Dispatch {
    /// The envelope was routed; the response holds a result or an error.
    Completed(JsonRpcResponse),
    /// The envelope itself was invalid; transports answer with a 4xx status.
    Rejected(JsonRpcResponse),
}

impl Dispatch {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn response(&self) -> &JsonRpcResponse {
        match self {
            Self::Completed(resp) | Self::Rejected(resp) => resp,
        }
    }

    pub fn into_response(self) -> JsonRpcResponse {
        match self {
            Self::Completed(resp) | Self::Rejected(resp) => resp,
        }
    }
}

/// Routes JSON-RPC requests to tools and resources.
pub struct Dispatcher {
    info: ServerInfo,
    tools: ToolRegistry,
    resources: Option<ResourceCatalog>,
    observer: Arc<dyn ToolObserver>,
    tool_timeout: Option<Duration>,
}

impl Dispatcher {
    /// A tools-only dispatcher logging tool calls through `tracing`.
    pub fn new(info: ServerInfo, tools: ToolRegistry) -> Self {
        Self {
            info,
            tools,
            resources: None,
            observer: Arc::new(TracingObserver),
            tool_timeout: None,
        }
    }

    /// Serve `resources/list` and `resources/read` from `catalog`.
    #[must_use]
    pub fn with_resources(mut self, catalog: ResourceCatalog) -> Self {
        self.resources = Some(catalog);
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ToolObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Fail tool calls that run longer than `timeout`.
    #[must_use]
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = Some(timeout);
        self
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Handle one parsed JSON-RPC request.
    pub async fn dispatch(&self, request: &Value) -> Dispatch {
        let id = request.get("id").cloned().unwrap_or(Value::Null);

        let Some(method) = request.get("method") else {
            tracing::warn!(%id, "rejecting request without method");
            return Dispatch::Rejected(JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                "Invalid Request: missing 'method' field",
            ));
        };
        let method = method
            .as_str()
            .map_or_else(|| method.to_string(), ToString::to_string);

        tracing::debug!(%method, %id, "dispatching request");

        match self.route(&method, request.get("params")).await {
            Ok(result) => Dispatch::Completed(JsonRpcResponse::success(id, result)),
            Err(err) => {
                tracing::warn!(%method, error = %err, "request failed");
                Dispatch::Completed(err.into_response(id))
            }
        }
    }

    async fn route(&self, method: &str, params: Option<&Value>) -> Result<Value, McpError> {
        match (method, &self.resources) {
            ("initialize", _) => Ok(self.initialize()),
            ("resources/list", Some(catalog)) => Ok(json!({ "resources": catalog.descriptors() })),
            ("resources/read", Some(catalog)) => {
                let uri = param_str(params, "uri")?;
                let contents = catalog.read(uri)?;
                Ok(json!({ "contents": [contents] }))
            }
            ("tools/list", _) => Ok(json!({ "tools": self.tools.definitions() })),
            ("tools/call", _) => self.call_tool(params).await,
            _ => Err(McpError::UnknownMethod(method.to_string())),
        }
    }

    fn initialize(&self) -> Value {
        let mut capabilities = serde_json::Map::new();
        if self.resources.is_some() {
            capabilities.insert("resources".to_string(), json!({}));
        }
        capabilities.insert("tools".to_string(), json!({}));

        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": capabilities,
            "serverInfo": self.info,
        })
    }

    async fn call_tool(&self, params: Option<&Value>) -> Result<Value, McpError> {
        let name = param_str(params, "name")?;
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;
        let args = Arguments::from_params(params.and_then(|p| p.get("arguments")));

        let started = Instant::now();
        let outcome = self.run_tool(name, tool, &args).await;
        self.observer.tool_executed(&ToolEvent {
            tool: name,
            arguments: &args,
            elapsed: started.elapsed(),
            error: outcome.as_ref().err(),
        });

        let content = outcome?.into_content()?;
        Ok(serde_json::to_value(CallToolResult { content })?)
    }

    async fn run_tool(&self, name: &str, tool: &dyn Tool, args: &Arguments) -> Result<ToolOutput, McpError> {
        let execution = tool.execute(args);
        let result = match self.tool_timeout {
            Some(timeout) => tokio::time::timeout(timeout, execution)
                .await
                .map_err(|_| McpError::ToolTimedOut {
                    tool: name.to_string(),
                    timeout_ms: timeout.as_millis(),
                })?,
            None => execution.await,
        };

        result.map_err(|source| McpError::ToolFailed {
            tool: name.to_string(),
            source,
        })
    }
}

fn param_str<'a>(params: Option<&'a Value>, name: &'static str) -> Result<&'a str, McpError> {
    params
        .and_then(|p| p.get(name))
        .and_then(Value::as_str)
        .ok_or(McpError::MissingParameter(name))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::content::ContentBlock;
    use crate::error::ToolError;
    use crate::resources::ResourceDescriptor;
    use crate::tools::{InputSchema, PropertySchema, ToolDefinition};

    struct Greet;

    #[async_trait]
    impl Tool for Greet {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(
                "greet",
                "Greet someone.",
                InputSchema::object()
                    .property("who", PropertySchema::string("Who to greet"))
                    .required("who"),
            )
        }

        async fn execute(&self, args: &Arguments) -> Result<ToolOutput, ToolError> {
            let mut v = args.validator();
            let who = v.required_str("who");
            v.finish()?;
            Ok(ToolOutput::json(&json!({ "greeting": format!("hello {who}") }))?)
        }
    }

    struct Sleepy;

    #[async_trait]
    impl Tool for Sleepy {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("sleepy", "Takes its time.", InputSchema::object())
        }

        async fn execute(&self, _args: &Arguments) -> Result<ToolOutput, ToolError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(ToolOutput::Content(vec![ContentBlock::text("done")]))
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(String, bool)>>,
    }

    impl ToolObserver for Recorder {
        fn tool_executed(&self, event: &ToolEvent<'_>) {
            self.events
                .lock()
                .unwrap()
                .push((event.tool.to_string(), event.succeeded()));
        }
    }

    fn info() -> ServerInfo {
        ServerInfo {
            name: "TestServer".to_string(),
            version: "1.0.0".to_string(),
            description: "Test".to_string(),
        }
    }

    fn dispatcher() -> Dispatcher {
        let tools = ToolRegistry::new().with(Greet).unwrap();
        let mut catalog = ResourceCatalog::new();
        catalog
            .register(
                ResourceDescriptor::json("test://greetings", "Greetings", "All greetings"),
                || serde_json::to_string(&["hello", "hola"]),
            )
            .unwrap();
        Dispatcher::new(info(), tools).with_resources(catalog)
    }

    fn error_of(dispatch: &Dispatch) -> (i32, String) {
        let error = dispatch.response().error.clone().unwrap();
        (error.code, error.message)
    }

    #[tokio::test]
    async fn missing_method_is_rejected_with_id() {
        let d = dispatcher();

        let out = d.dispatch(&json!({"jsonrpc": "2.0", "id": 42})).await;
        assert!(out.is_rejected());
        assert_eq!(error_of(&out).0, -32600);
        assert_eq!(out.response().id, json!(42));

        let out = d.dispatch(&json!({"jsonrpc": "2.0"})).await;
        assert!(out.is_rejected());
        assert!(out.response().id.is_null());
    }

    #[tokio::test]
    async fn non_object_request_is_rejected() {
        let out = dispatcher().dispatch(&json!([1, 2, 3])).await;
        assert!(out.is_rejected());
        assert!(out.response().id.is_null());
    }

    #[tokio::test]
    async fn id_is_echoed_verbatim() {
        let d = dispatcher();
        for id in [json!("abc"), json!(7), Value::Null] {
            let out = d
                .dispatch(&json!({"jsonrpc": "2.0", "id": id.clone(), "method": "tools/list"}))
                .await;
            assert_eq!(out.response().id, id);
        }
    }

    #[tokio::test]
    async fn initialize_advertises_resources_only_with_catalog() {
        let out = dispatcher()
            .dispatch(&json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}))
            .await;
        let result = out.into_response().result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "TestServer");
        assert!(result["capabilities"].get("resources").is_some());

        let tools_only = Dispatcher::new(info(), ToolRegistry::new().with(Greet).unwrap());
        let out = tools_only
            .dispatch(&json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}))
            .await;
        let result = out.into_response().result.unwrap();
        assert!(result["capabilities"].get("resources").is_none());
        assert!(result["capabilities"].get("tools").is_some());
    }

    #[tokio::test]
    async fn unknown_method_is_internal_error() {
        let out = dispatcher()
            .dispatch(&json!({"jsonrpc": "2.0", "id": 1, "method": "prompts/list"}))
            .await;
        assert!(!out.is_rejected());
        assert!(out.response().result.is_none());
        assert_eq!(error_of(&out), (-32603, "Unknown method: prompts/list".to_string()));
    }

    #[tokio::test]
    async fn non_string_method_is_unknown() {
        let out = dispatcher()
            .dispatch(&json!({"jsonrpc": "2.0", "id": 1, "method": 5}))
            .await;
        assert_eq!(error_of(&out), (-32603, "Unknown method: 5".to_string()));
    }

    #[tokio::test]
    async fn resources_without_catalog_are_unknown_methods() {
        let d = Dispatcher::new(info(), ToolRegistry::new());
        let out = d
            .dispatch(&json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}))
            .await;
        assert_eq!(error_of(&out).1, "Unknown method: resources/list");
    }

    #[tokio::test]
    async fn resources_read() {
        let d = dispatcher();
        let out = d
            .dispatch(&json!({
                "jsonrpc": "2.0", "id": 1, "method": "resources/read",
                "params": {"uri": "test://greetings"}
            }))
            .await;
        let result = out.into_response().result.unwrap();
        assert_eq!(result["contents"][0]["uri"], "test://greetings");
        assert_eq!(result["contents"][0]["mimeType"], "application/json");
        assert_eq!(result["contents"][0]["text"], r#"["hello","hola"]"#);

        let out = d
            .dispatch(&json!({
                "jsonrpc": "2.0", "id": 2, "method": "resources/read",
                "params": {"uri": "test://nope"}
            }))
            .await;
        assert_eq!(error_of(&out), (-32603, "Unknown resource URI: test://nope".to_string()));

        let out = d
            .dispatch(&json!({"jsonrpc": "2.0", "id": 3, "method": "resources/read"}))
            .await;
        assert!(error_of(&out).1.contains("'uri'"));
    }

    #[tokio::test]
    async fn tools_call_wraps_raw_value_in_text_block() {
        let out = dispatcher()
            .dispatch(&json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                "params": {"name": "greet", "arguments": {"who": "Ana"}}
            }))
            .await;
        let resp = out.into_response();
        assert!(resp.error.is_none());

        let content = resp.result.unwrap()["content"].clone();
        assert_eq!(content.as_array().unwrap().len(), 1);
        assert_eq!(content[0]["type"], "text");
        let inner: Value = serde_json::from_str(content[0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(inner["greeting"], "hello Ana");
    }

    #[tokio::test]
    async fn tools_call_unknown_tool_names_it() {
        let out = dispatcher()
            .dispatch(&json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                "params": {"name": "does_not_exist"}
            }))
            .await;
        let (code, message) = error_of(&out);
        assert_eq!(code, -32603);
        assert!(message.contains("does_not_exist"));
    }

    #[tokio::test]
    async fn tools_call_missing_argument_names_parameter() {
        let out = dispatcher()
            .dispatch(&json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                "params": {"name": "greet"}
            }))
            .await;
        let (code, message) = error_of(&out);
        assert_eq!(code, -32603);
        assert!(message.contains("'who'"));
    }

    #[tokio::test]
    async fn tools_call_without_name() {
        let out = dispatcher()
            .dispatch(&json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call", "params": {}}))
            .await;
        assert_eq!(error_of(&out).1, "Missing required parameter 'name'");
    }

    #[tokio::test]
    async fn observer_sees_every_execution() {
        let recorder = Arc::new(Recorder::default());
        let d = dispatcher().with_observer(recorder.clone());

        for args in [json!({"who": "Ana"}), json!({})] {
            d.dispatch(&json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                "params": {"name": "greet", "arguments": args}
            }))
            .await;
        }
        // Unknown tools never reach execution.
        d.dispatch(&json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": {"name": "nope"}
        }))
        .await;

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(events, [("greet".to_string(), true), ("greet".to_string(), false)]);
    }

    #[tokio::test(start_paused = true)]
    async fn tool_timeout() {
        let d = Dispatcher::new(info(), ToolRegistry::new().with(Sleepy).unwrap())
            .with_tool_timeout(Duration::from_millis(50));

        let out = d
            .dispatch(&json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                "params": {"name": "sleepy"}
            }))
            .await;
        assert_eq!(error_of(&out), (-32603, "Tool 'sleepy' timed out after 50ms".to_string()));
    }

    #[tokio::test]
    async fn listings_are_stable() {
        let d = dispatcher();
        let list = |method: &'static str| {
            let d = &d;
            async move {
                d.dispatch(&json!({"jsonrpc": "2.0", "id": 1, "method": method}))
                    .await
                    .into_response()
                    .result
            }
        };

        assert_eq!(list("tools/list").await, list("tools/list").await);
        assert_eq!(list("resources/list").await, list("resources/list").await);
    }
}
