use std::process;

use env_logger::Env;
use log::{error, info};
use tokio_util::sync::CancellationToken;

use ais_feed_server::config::{FeedConfig, FixMode};
use ais_feed_server::tcp_server::AisTcpServer;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match FeedConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(2);
        }
    };

    info!("Starting AIS feed server");
    info!("  - Bind: {}", config.socket_addr());
    info!("  - Send interval: {:?}", config.send_interval);
    info!(
        "  - Fix mode: {}",
        match config.fix.mode {
            FixMode::Static => "static",
            FixMode::Live => "live",
        }
    );
    if let Some(mmsi) = config.fix.mmsi {
        info!("  - Own-ship AIVDO report enabled (MMSI {})", mmsi);
    }

    let server = match AisTcpServer::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            signal.cancel();
        }
    });

    if let Err(e) = server.serve(shutdown).await {
        error!("Server error: {}", e);
        process::exit(1);
    }
    info!("Server stopped");
}
