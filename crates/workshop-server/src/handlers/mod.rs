mod health;
mod mcp;

pub use health::{health, HealthStatus};
pub use mcp::mcp_request;
