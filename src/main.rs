use std::net::SocketAddr;

use clap::Parser;
use person_registry::{config::Config, routes::create_router, storage, utils::init_logger, AppState};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "person-registry", version, about = "Person registry HTTP service")]
struct Cli {
    /// Listen address, overrides HOST
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let _log_guard = init_logger(config.logging.log_dir.as_deref());
    info!("Configuration loaded: {:?}", config.server);

    let backend = storage::connect(&config.storage)?;
    info!(
        csv_key = %config.storage.csv_object_key,
        prefix = %config.storage.record_prefix,
        count_scope = ?config.storage.count_scope,
        timeout_secs = config.storage.timeout_secs,
        "Record stores configured"
    );

    let state = AppState::new(config.clone(), backend);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
