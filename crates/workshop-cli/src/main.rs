use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

mod rpc_cmd;

use rpc_cmd::RpcClient;

#[derive(Parser)]
#[command(name = "workshop", about = "Workshop CLI - talk JSON-RPC to an MCP tool server")]
struct Cli {
    /// Tool server URL
    #[arg(long, env = "WORKSHOP_URL", default_value = "http://localhost:5011")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the initialize handshake and print the server info
    Init,

    /// List the tools the server exposes
    Tools,

    /// Call a tool
    Call {
        /// Tool name
        name: String,

        /// Tool arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },

    /// List the server's resources
    Resources,

    /// Read a resource by URI
    Read {
        uri: String,
    },

    /// Check the server's health endpoint
    Health,
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = RpcClient::new(&cli.url);

    match cli.command {
        Commands::Init => {
            let result = client
                .call(
                    "initialize",
                    Some(json!({"clientInfo": {"name": "workshop-cli", "version": env!("CARGO_PKG_VERSION")}})),
                )
                .await?;
            print_json(&result)?;
        }
        Commands::Tools => print_json(&client.call("tools/list", None).await?)?,
        Commands::Call { name, args } => {
            let arguments = rpc_cmd::parse_arguments(args.as_deref())?;
            let result = client
                .call("tools/call", Some(json!({"name": name, "arguments": arguments})))
                .await?;
            rpc_cmd::print_tool_result(&result)?;
        }
        Commands::Resources => print_json(&client.call("resources/list", None).await?)?,
        Commands::Read { uri } => {
            let result = client.call("resources/read", Some(json!({"uri": uri}))).await?;
            print_json(&result)?;
        }
        Commands::Health => {
            let url = format!("{}/health", cli.url.trim_end_matches('/'));
            let resp = reqwest::get(&url).await?;
            if !resp.status().is_success() {
                anyhow::bail!("health check failed: {}", resp.status());
            }
            print_json(&resp.json::<Value>().await?)?;
        }
    }

    Ok(())
}
