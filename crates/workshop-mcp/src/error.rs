use serde_json::Value;

use crate::args::ArgumentProblem;
use crate::jsonrpc::{JsonRpcResponse, INTERNAL_ERROR};

/// Failure raised by a tool while executing a call.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid arguments: {}", join_problems(.0))]
    InvalidArguments(Vec<ArgumentProblem>),

    #[error("failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn join_problems(problems: &[ArgumentProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure raised while routing or executing a request.
///
/// All variants share the wire code `-32603`; clients tell them apart by
/// message text.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown resource URI: {0}")]
    UnknownResource(String),

    #[error("Missing required parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("Tool '{tool}' failed: {source}")]
    ToolFailed {
        tool: String,
        #[source]
        source: ToolError,
    },

    #[error("Tool '{tool}' timed out after {timeout_ms}ms")]
    ToolTimedOut { tool: String, timeout_ms: u128 },

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl McpError {
    /// JSON-RPC error code reported for this error.
    pub fn code(&self) -> i32 {
        INTERNAL_ERROR
    }

    /// Wrap the error in a JSON-RPC error envelope.
    pub fn into_response(self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::error(id, self.code(), self.to_string())
    }
}

/// Rejected registration of a tool or resource.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("tool already registered: {0}")]
    DuplicateTool(String),

    #[error("resource already registered: {0}")]
    DuplicateResource(String),

    #[error("tool '{tool}' requires undeclared property '{property}'")]
    UndeclaredRequired { tool: String, property: String },
}
