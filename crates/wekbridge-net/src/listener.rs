//! OSC listener: bound UDP socket plus a dedicated receive thread.
//!
//! The thread decodes each datagram and hands it to [`InboundState`]. It runs
//! until [`OscListener::stop`] (or drop) or until the socket fails; either way
//! the `active` flag is cleared so the owner can start a fresh listener.

use crate::error::{Error, Result};
use crate::inbound::InboundState;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};
use wekbridge_osc::decode;

/// Largest datagram read in one call; longer packets are truncated by the OS
/// and then rejected by the decoder.
pub const RECV_BUFFER_SIZE: usize = 4096;

/// Socket read timeout. Bounds how long [`OscListener::stop`] waits for the
/// receive thread to notice shutdown.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct OscListener {
    port: u16,
    running: Arc<AtomicBool>,
    active: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl OscListener {
    /// Bind `0.0.0.0:port` with address reuse and start receiving into `state`.
    ///
    /// Port 0 picks an ephemeral port; see [`OscListener::port`]. The thread is
    /// only spawned once the bind succeeded.
    pub fn start(port: u16, state: Arc<InboundState>) -> Result<Self> {
        let socket = bind_reusable(port).map_err(|source| Error::Bind { port, source })?;
        let bound_port = socket.local_addr()?.port();

        let running = Arc::new(AtomicBool::new(true));
        let active = Arc::new(AtomicBool::new(true));

        let thread = {
            let running = Arc::clone(&running);
            let active = Arc::clone(&active);
            thread::Builder::new()
                .name("wekbridge-osc-listener".to_string())
                .spawn(move || {
                    let _active = ClearOnExit(active);
                    receive_loop(&socket, &state, &running);
                    debug!("OSC listener on port {} exited", bound_port);
                })?
        };

        debug!("OSC listener started on port {}", bound_port);
        Ok(Self {
            port: bound_port,
            running,
            active,
            thread: Some(thread),
        })
    }

    /// Locally bound port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// False once stopped or after the receive loop died.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Stop the receive thread and release the port. Idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("OSC listener thread on port {} panicked", self.port);
            }
            debug!("OSC listener on port {} stopped", self.port);
        }
        self.active.store(false, Ordering::Release);
    }
}

impl Drop for OscListener {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for OscListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OscListener")
            .field("port", &self.port)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Clears the shared `active` flag when the receive thread ends, including by
/// unwinding.
struct ClearOnExit(Arc<AtomicBool>);

impl Drop for ClearOnExit {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn bind_reusable(port: u16) -> io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)).into())?;
    socket.set_read_timeout(Some(POLL_INTERVAL))?;
    Ok(socket.into())
}

fn receive_loop(socket: &UdpSocket, state: &InboundState, running: &AtomicBool) {
    let mut buf = [0u8; RECV_BUFFER_SIZE];

    while running.load(Ordering::Acquire) {
        match socket.recv_from(&mut buf) {
            Ok((len, _peer)) => {
                if let Some(message) = decode(&buf[..len]) {
                    state.apply(message);
                }
            }
            Err(e) if is_transient(&e) => {}
            Err(e) => {
                warn!("OSC receive failed, stopping listener: {}", e);
                break;
            }
        }
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::Interrupted
            // ICMP port-unreachable from an earlier send (Windows)
            | io::ErrorKind::ConnectionReset
    )
}
