//! OSC message codec for wekbridge.
//!
//! Encodes and decodes single OSC 1.0 messages carrying `f` (float32), `i`
//! (int32) and `s` (string) arguments. Every structural block on the wire is
//! NUL-padded to a 4-byte boundary and numbers are big-endian.
//!
//! # Example
//!
//! ```
//! use wekbridge_osc::{decode, OscMessage};
//!
//! let msg = OscMessage::new("/wek/inputs").arg(0.5f32).arg(1.25f32);
//! let bytes = msg.encode();
//! assert_eq!(bytes.len(), 24);
//!
//! let back = decode(&bytes).unwrap();
//! assert_eq!(back.address, "/wek/inputs");
//! assert_eq!(back.type_tags(), "ff");
//! ```
//!
//! [`decode`] never fails loudly: malformed packets resolve to `None`. Use
//! [`OscMessage::from_bytes`] when the reason matters.

pub mod error;
pub use error::{CodecError, Result};

mod arg;
pub use arg::OscArg;

mod message;
pub use message::{decode, encode, OscArgs, OscMessage};
