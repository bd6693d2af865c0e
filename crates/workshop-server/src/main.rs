use clap::Parser;
use tracing_subscriber::EnvFilter;

use workshop_server::app_state::AppState;
use workshop_server::config::Config;
use workshop_server::{router, variants};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    let dispatcher = variants::build_dispatcher(&config)?;
    let info = dispatcher.info().clone();
    tracing::info!(
        server = %info.name,
        variant = ?config.variant,
        tools = ?dispatcher.tools().names().collect::<Vec<_>>(),
        "dispatcher ready"
    );

    let app = router::create_router(AppState::new(dispatcher));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("{} listening on http://{addr}/mcp", info.name);

    axum::serve(listener, app).await?;
    Ok(())
}
