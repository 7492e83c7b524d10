//! Cycle driver: the context object the host ticks once per frame.
//!
//! ```no_run
//! use wekbridge::{Bridge, BridgeConfig, Pulse};
//!
//! let mut bridge = Bridge::with_udp();
//! let mut config = BridgeConfig::default();
//! config.run = true;
//!
//! let frame = bridge.tick(&config, Some(&[0.5, 1.2]));
//! let first = frame.get("output1");
//!
//! bridge.pulse(Pulse::StartDtwRecording, &config, None);
//! bridge.shutdown();
//! # let _ = first;
//! ```

use crate::commands::{input_message, Pulse};
use crate::config::{BridgeConfig, SendMode};
use crate::error::{Error, Result};
use crate::output::OutputFrame;
use crate::toggles::ToggleState;
use std::sync::Arc;
use tracing::{debug, warn};
use wekbridge_net::{InboundState, MessageSink, OscListener, OscMessage, UdpSender};

/// Owns the listener, the shared inbound state, the toggle memory and the
/// outbound sink.
///
/// Dropping the bridge stops the listener.
pub struct Bridge<S: MessageSink = UdpSender> {
    sink: S,
    inbound: Arc<InboundState>,
    listener: Option<OscListener>,
    /// Port the current listener was started for (may differ from the bound
    /// port when 0 was requested).
    requested_port: u16,
    toggles: ToggleState,
    last_error: Option<Error>,
    warned_port: Option<u16>,
}

impl Bridge<UdpSender> {
    /// Bridge sending over a real UDP socket.
    pub fn with_udp() -> Self {
        Self::new(UdpSender::new())
    }
}

impl<S: MessageSink> Bridge<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            inbound: Arc::new(InboundState::new()),
            listener: None,
            requested_port: 0,
            toggles: ToggleState::default(),
            last_error: None,
            warned_port: None,
        }
    }

    // ==================== Per-frame cycle ====================

    /// Run one cycle: keep the listener alive, send toggle changes and
    /// inputs, then drain inbound values into a frame.
    ///
    /// Never fails; transport problems are logged and the affected step is
    /// skipped or retried on the next tick.
    pub fn tick(&mut self, config: &BridgeConfig, inputs: Option<&[f32]>) -> OutputFrame {
        self.ensure_listener(config.listen_port);

        let target = config.remote_target();
        for address in self.toggles.reconcile(config) {
            self.sink.send_best_effort(&target, &OscMessage::new(address));
        }

        if config.send_mode == SendMode::EveryFrame {
            if let Some(inputs) = inputs {
                self.sink
                    .send_best_effort(&target, &input_message(config, inputs));
            }
        }

        let drained = self.inbound.drain(&config.output_address);
        OutputFrame::from_drained(&drained, config.sample_rate)
    }

    /// Send the command for a one-shot action.
    ///
    /// Returns false when nothing was sent (`SendInputs` without inputs).
    pub fn pulse(&self, pulse: Pulse, config: &BridgeConfig, inputs: Option<&[f32]>) -> bool {
        match pulse.message(config, inputs) {
            Some(message) => {
                debug!("Pulse {:?} -> {}", pulse, message.address);
                self.sink.send_best_effort(&config.remote_target(), &message);
                true
            }
            None => false,
        }
    }

    /// Feed one raw datagram into the inbound state, as the listener would.
    ///
    /// For hosts that own the receiving socket themselves.
    pub fn receive_packet(&self, bytes: &[u8]) -> Result<()> {
        let message = OscMessage::from_bytes(bytes)?;
        self.inbound.apply(message);
        Ok(())
    }

    // ==================== Listener lifecycle ====================

    fn ensure_listener(&mut self, port: u16) {
        let healthy = self.requested_port == port
            && self.listener.as_ref().is_some_and(OscListener::is_active);
        if healthy {
            return;
        }

        if let Some(mut old) = self.listener.take() {
            old.stop();
        }
        self.requested_port = port;

        match OscListener::start(port, Arc::clone(&self.inbound)) {
            Ok(listener) => {
                debug!("Listening for OSC on port {}", listener.port());
                self.listener = Some(listener);
                self.last_error = None;
                self.warned_port = None;
            }
            Err(e) => {
                if self.warned_port == Some(port) {
                    debug!("OSC listener bind retry failed: {}", e);
                } else {
                    warn!("OSC listener unavailable, retrying each tick: {}", e);
                    self.warned_port = Some(port);
                }
                self.last_error = Some(e.into());
            }
        }
    }

    /// Stop the listener and release its port. Idempotent; the next
    /// [`tick`](Self::tick) starts a new one.
    pub fn shutdown(&mut self) {
        if let Some(mut listener) = self.listener.take() {
            listener.stop();
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listener.as_ref().is_some_and(OscListener::is_active)
    }

    /// Locally bound listening port, if a listener is running.
    pub fn listening_port(&self) -> Option<u16> {
        self.listener
            .as_ref()
            .filter(|listener| listener.is_active())
            .map(OscListener::port)
    }

    /// Most recent listener start failure; cleared by a successful start.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    // ==================== Accessors ====================

    pub fn inbound(&self) -> &Arc<InboundState> {
        &self.inbound
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn toggles(&self) -> ToggleState {
        self.toggles
    }
}

impl<S: MessageSink> Drop for Bridge<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<S: MessageSink> std::fmt::Debug for Bridge<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("listener", &self.listener)
            .field("toggles", &self.toggles)
            .field("last_error", &self.last_error)
            .finish()
    }
}
