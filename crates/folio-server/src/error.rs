//! Server startup and runtime errors

use std::net::SocketAddr;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid bind address '{bind}': {message}")]
    InvalidBind { bind: String, message: String },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server I/O error: {0}")]
    Io(#[source] std::io::Error),
}
