//! UDP transport for wekbridge.
//!
//! - [`UdpSender`] / [`MessageSink`]: fire-and-forget OSC output.
//! - [`OscListener`]: bound socket plus background receive thread.
//! - [`InboundState`]: lock-protected hand-off between the listener thread
//!   and the per-tick consumer (latest value per address, coalesced events).

pub mod error;
pub use error::{Error, Result};

mod sender;
pub use sender::{MessageSink, RemoteTarget, UdpSender};

mod inbound;
pub use inbound::{event_index, Drained, InboundState};

mod listener;
pub use listener::{OscListener, POLL_INTERVAL, RECV_BUFFER_SIZE};

pub use wekbridge_osc::{OscArg, OscMessage};
