use std::error::Error;

use ais_feed_server::nmea::verify_checksum;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:4001".to_string());

    // Connect to the feed server
    let stream = TcpStream::connect(&addr).await?;
    println!("Connected to AIS feed server at {}", addr);

    let mut lines = BufReader::new(stream).lines();
    let mut received = 0usize;
    let mut invalid = 0usize;

    // Read sentences and recompute every checksum
    while let Some(line) = lines.next_line().await? {
        received += 1;
        let valid = verify_checksum(&line);
        if !valid {
            invalid += 1;
        }
        println!("[{:3}] {} {}", received, if valid { "OK " } else { "BAD" }, line);

        if received >= 30 {
            break;
        }
    }

    println!();
    println!(
        "Received {} sentences, {} with bad checksums",
        received, invalid
    );
    Ok(())
}
