use std::time::Duration;

use crate::args::Arguments;
use crate::error::McpError;

/// A finished tool call, reported to the dispatcher's observer.
#[derive(Debug)]
pub struct ToolEvent<'a> {
    pub tool: &'a str,
    pub arguments: &'a Arguments,
    pub elapsed: Duration,
    pub error: Option<&'a McpError>,
}

impl ToolEvent<'_> {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Hook invoked by the dispatcher after every tool execution.
pub trait ToolObserver: Send + Sync {
    fn tool_executed(&self, event: &ToolEvent<'_>);
}

/// Default observer: one `tracing` event per tool call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ToolObserver for TracingObserver {
    fn tool_executed(&self, event: &ToolEvent<'_>) {
        let elapsed_ms = event.elapsed.as_millis();
        match event.error {
            None => tracing::info!(
                tool = event.tool,
                arguments = %event.arguments,
                elapsed_ms,
                "tool executed"
            ),
            Some(err) => tracing::warn!(
                tool = event.tool,
                arguments = %event.arguments,
                elapsed_ms,
                error = %err,
                "tool failed"
            ),
        }
    }
}
