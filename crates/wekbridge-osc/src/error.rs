//! Error types for the OSC codec.

use thiserror::Error;

/// Why a packet could not be decoded as an OSC message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("address is not NUL-terminated")]
    MissingAddressTerminator,

    #[error("address is empty")]
    EmptyAddress,

    #[error("invalid UTF-8 at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("type tag block missing or does not start with ','")]
    MissingTypeTags,

    #[error("type tag block is not NUL-terminated")]
    MissingTypeTagTerminator,

    #[error("argument '{tag}' truncated at offset {offset}")]
    Truncated { tag: char, offset: usize },

    #[error("string argument at offset {offset} is not NUL-terminated")]
    UnterminatedString { offset: usize },
}

pub type Result<T> = std::result::Result<T, CodecError>;
