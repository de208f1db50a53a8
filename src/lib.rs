pub mod aivdo;
pub mod config;
pub mod error;
pub mod nmea;
pub mod tcp_server;
pub mod vessel_simulator;

// Re-export commonly used types and functions for convenience
pub use config::{FeedConfig, FixConfig, FixMode, DEFAULT_PORT, DEFAULT_SEND_INTERVAL};
pub use error::{ServerError, ServerResult};
pub use nmea::{checksum, verify_checksum, Sentence, SentenceBlock};
pub use tcp_server::{send_block, AisTcpServer};
pub use vessel_simulator::VesselSimulator;
