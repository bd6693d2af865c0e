use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::tools::SimulatedLatency;
use crate::variants::ServerVariant;

/// Server settings, read from flags with environment fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(name = "workshop-server", version, about = "MCP tool server for the workshop store")]
pub struct Config {
    /// Which tool server to run
    #[arg(long, env = "WORKSHOP_VARIANT", value_enum, default_value_t = ServerVariant::Analytics)]
    pub variant: ServerVariant,

    #[arg(long, env = "WORKSHOP_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Defaults to 5010 (sales), 5011 (analytics) or 5012 (inventory)
    #[arg(long, env = "WORKSHOP_PORT")]
    pub port: Option<u16>,

    /// Directory holding the JSON fixture files
    #[arg(long, env = "WORKSHOP_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Override the simulated latency of the inventory tools
    #[arg(long, env = "WORKSHOP_LATENCY_MS")]
    pub latency_ms: Option<u64>,

    /// Fail tool calls that run longer than this
    #[arg(long, env = "WORKSHOP_TOOL_TIMEOUT_MS")]
    pub tool_timeout_ms: Option<u64>,
}

impl Config {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.variant.default_port())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port())
    }

    pub fn latency(&self) -> SimulatedLatency {
        self.latency_ms
            .map_or_else(SimulatedLatency::default, |ms| {
                SimulatedLatency::uniform(Duration::from_millis(ms))
            })
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_ms.map(Duration::from_millis)
    }
}
