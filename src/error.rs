use std::net::SocketAddr;

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding the listener failed. Fatal: the server has no purpose
    /// without a listening socket.
    #[error("failed to bind to {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A startup configuration value could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidConfig { var: &'static str, value: String },
}
