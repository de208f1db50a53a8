use std::error::Error;
use std::time::Duration;

use ais_feed_server::nmea::verify_checksum;
use rand::Rng;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};

const CLIENTS: usize = 4;
const BLOCK_SENTENCES: usize = 3;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:4001".to_string());
    println!("Multi-client isolation test against {}", addr);

    // Phase 1: connect clients with a random stagger
    println!("\nPhase 1: connecting {} clients...", CLIENTS);
    let mut readers = Vec::new();
    for id in 0..CLIENTS {
        let delay: u64 = rand::thread_rng().gen_range(0..400);
        sleep(Duration::from_millis(delay)).await;
        let stream = TcpStream::connect(&addr).await?;
        println!("  Client {} connected", id);
        readers.push(BufReader::new(stream).lines());
    }

    // Phase 2: every client must receive a complete block
    println!("\nPhase 2: verifying all clients receive data...");
    for (id, lines) in readers.iter_mut().enumerate() {
        read_block(id, lines).await?;
        println!("  Client {} received a valid block", id);
    }

    // Phase 3: drop one client mid-stream
    println!("\nPhase 3: dropping client 0...");
    drop(readers.remove(0));

    // Phase 4: the survivors must keep receiving intact blocks
    println!("\nPhase 4: verifying the remaining clients are unaffected...");
    let mut all_ok = true;
    for round in 1..=3 {
        for (offset, lines) in readers.iter_mut().enumerate() {
            let id = offset + 1;
            match read_block(id, lines).await {
                Ok(()) => println!("  Round {}: client {} ok", round, id),
                Err(e) => {
                    println!("  Round {}: client {} FAILED: {}", round, id, e);
                    all_ok = false;
                }
            }
        }
    }

    println!("\nTest summary:");
    println!("  - Clients started: {}", CLIENTS);
    println!(
        "  - Survivors unaffected by the disconnect: {}",
        if all_ok { "yes" } else { "NO" }
    );

    if !all_ok {
        std::process::exit(1);
    }
    Ok(())
}

async fn read_block(
    id: usize,
    lines: &mut Lines<BufReader<TcpStream>>,
) -> Result<(), Box<dyn Error>> {
    for _ in 0..BLOCK_SENTENCES {
        let line = timeout(Duration::from_secs(3), lines.next_line())
            .await
            .map_err(|_| format!("client {}: timed out waiting for data", id))??
            .ok_or_else(|| format!("client {}: feed closed", id))?;
        if !verify_checksum(&line) {
            return Err(format!("client {}: bad checksum: {}", id, line).into());
        }
    }
    Ok(())
}
