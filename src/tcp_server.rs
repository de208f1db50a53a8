use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{info, warn};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::FeedConfig;
use crate::error::{ServerError, ServerResult};
use crate::nmea::SentenceBlock;
use crate::vessel_simulator::VesselSimulator;

/// The streaming feed server: accepts connections and pushes a block of
/// navigation sentences to each client on a fixed cadence.
pub struct AisTcpServer {
    listener: TcpListener,
    config: Arc<FeedConfig>,
    client_counter: AtomicUsize,
}

impl AisTcpServer {
    /// Binds the listening socket. Failing to bind is fatal; nothing else
    /// is started before this succeeds.
    pub async fn bind(config: FeedConfig) -> ServerResult<Self> {
        let addr = config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::BindFailed { addr, source })?;
        info!("AIS feed server listening on {}", addr);

        Ok(Self {
            listener,
            config: Arc::new(config),
            client_counter: AtomicUsize::new(0),
        })
    }

    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until `shutdown` is cancelled, spawning an
    /// independent handler task per client. A handler failing or a client
    /// dropping never affects the accept loop or any other client. On
    /// shutdown, waits for the live handlers to wind down.
    pub async fn serve(self, shutdown: CancellationToken) -> ServerResult<()> {
        let handlers = TaskTracker::new();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested, no longer accepting connections");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((socket, addr)) => {
                        let client_id = self.client_counter.fetch_add(1, Ordering::SeqCst);
                        info!("New connection from {} (client {})", addr, client_id);
                        handlers.spawn(handle_client(
                            client_id,
                            socket,
                            addr,
                            Arc::clone(&self.config),
                            shutdown.clone(),
                        ));
                    }
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                    }
                }
            }
        }

        handlers.close();
        handlers.wait().await;
        info!("All client handlers stopped");
        Ok(())
    }
}

// Owns one client connection for its whole lifetime. The feed is
// write-only: nothing is ever read from the socket, so a dropped peer
// surfaces as an error on the next write.
async fn handle_client(
    client_id: usize,
    mut socket: TcpStream,
    peer: SocketAddr,
    config: Arc<FeedConfig>,
    shutdown: CancellationToken,
) {
    let simulator = VesselSimulator::new(config.fix.clone());
    let mut ticker = interval(config.send_interval);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Client {} ({}): closing, server shutting down", client_id, peer);
                break;
            }
            _ = ticker.tick() => {
                let block = simulator.block_at(chrono::Utc::now());
                if let Err(e) = send_block(&mut socket, &block).await {
                    info!("Client {} ({}) disconnected: {}", client_id, peer, e);
                    break;
                }
            }
        }
    }
    // Dropping the socket here releases the connection
}

pub async fn send_block(stream: &mut TcpStream, block: &SentenceBlock) -> io::Result<()> {
    stream.write_all(block.to_wire().as_bytes()).await?;
    stream.flush().await?;
    Ok(())
}
