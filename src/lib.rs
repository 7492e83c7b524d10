//! # wekbridge - host tick loop to Wekinator over OSC
//!
//! Bridges a frame-driven host and a Wekinator service:
//! - outbound: input vectors, toggle changes and one-shot commands are
//!   encoded as OSC and sent over UDP, best effort
//! - inbound: a background listener keeps the latest values per address and
//!   coalesces `.../output_<N>` events until the next tick drains them
//!
//! ## Crates
//!
//! - **wekbridge-osc** - OSC 1.0 codec (float, int, string arguments)
//! - **wekbridge-net** - UDP sender, listener thread, shared inbound state
//!
//! ## Quick Start
//!
//! ```no_run
//! use wekbridge::{Bridge, BridgeConfig};
//!
//! let mut bridge = Bridge::with_udp();
//! let config = BridgeConfig::default();
//!
//! // once per frame
//! let frame = bridge.tick(&config, Some(&[0.5, 1.2]));
//! for channel in &frame.channels {
//!     println!("{} = {}", channel.name, channel.value);
//! }
//! ```

pub mod bridge;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod params;
pub mod toggles;

pub use bridge::Bridge;
pub use commands::Pulse;
pub use config::{BridgeConfig, SendMode};
pub use error::{Error, Result};
pub use output::{OutputChannel, OutputFrame};
pub use params::{parameter, parameters, ParamKind, ParamValue, ParameterSpec};
pub use toggles::ToggleState;

/// Re-export of the codec crate
pub use wekbridge_osc as osc;

/// Re-export of the transport crate
pub use wekbridge_net as net;

pub use wekbridge_net::{InboundState, MessageSink, OscListener, RemoteTarget, UdpSender};
pub use wekbridge_osc::{OscArg, OscMessage};
