pub mod args;
pub mod content;
pub mod dispatcher;
pub mod error;
pub mod jsonrpc;
pub mod observer;
pub mod resources;
pub mod tools;

pub use args::{ArgumentProblem, Arguments, Validator};
pub use content::{ContentBlock, ResourceContents, ToolOutput};
pub use dispatcher::{Dispatch, Dispatcher, ServerInfo, PROTOCOL_VERSION};
pub use error::{McpError, RegistryError, ToolError};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use observer::{ToolEvent, ToolObserver, TracingObserver};
pub use resources::{ResourceCatalog, ResourceDescriptor};
pub use tools::{InputSchema, PropertySchema, PropertyType, Tool, ToolDefinition, ToolRegistry};
