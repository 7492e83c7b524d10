//! Error types for the UDP transport.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot bind listening port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot resolve {host}:{port}")]
    Resolve { host: String, port: u16 },

    #[error("Datagram truncated: sent {sent} of {len} bytes")]
    ShortSend { sent: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
