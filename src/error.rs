//! Centralized error type for the wekbridge umbrella crate.
//!
//! Wraps subsystem errors so `?` propagates across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Network: {0}")]
    Net(#[from] wekbridge_net::Error),

    #[error("OSC: {0}")]
    Codec(#[from] wekbridge_osc::CodecError),
}

pub type Result<T> = std::result::Result<T, Error>;
