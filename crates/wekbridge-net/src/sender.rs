//! Outbound OSC: encode once, transmit once, no retries.

use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::Arc;
use tracing::debug;
use wekbridge_osc::OscMessage;

/// Where outbound messages go.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteTarget {
    pub host: String,
    pub port: u16,
}

impl RemoteTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Resolve to an IPv4 socket address (the send socket is bound on IPv4).
    pub fn resolve(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .find(SocketAddr::is_ipv4)
            .ok_or_else(|| Error::Resolve {
                host: self.host.clone(),
                port: self.port,
            })
    }
}

/// Destination for outbound OSC messages.
///
/// The cycle driver and command dispatcher only talk to this trait, so the
/// UDP path can be swapped for a recorder in tests.
pub trait MessageSink: Send + Sync {
    fn send(&self, target: &RemoteTarget, message: &OscMessage) -> Result<()>;

    /// Send and discard any failure. Control streams resend every tick, so a
    /// lost datagram is superseded by the next one.
    fn send_best_effort(&self, target: &RemoteTarget, message: &OscMessage) {
        if let Err(e) = self.send(target, message) {
            debug!(
                "Dropped OSC message {} to {}:{}: {}",
                message.address, target.host, target.port, e
            );
        }
    }
}

impl<T: MessageSink + ?Sized> MessageSink for Arc<T> {
    fn send(&self, target: &RemoteTarget, message: &OscMessage) -> Result<()> {
        (**self).send(target, message)
    }
}

/// Datagram sender sharing one ephemeral socket across calls.
///
/// The socket is bound on first use; if binding fails the next send tries
/// again.
#[derive(Default)]
pub struct UdpSender {
    socket: Mutex<Option<UdpSocket>>,
}

impl UdpSender {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_socket<R>(&self, f: impl FnOnce(&UdpSocket) -> Result<R>) -> Result<R> {
        let mut guard = self.socket.lock();
        let socket = match guard.take() {
            Some(socket) => socket,
            None => {
                let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
                debug!("Bound OSC send socket on {:?}", socket.local_addr().ok());
                socket
            }
        };
        let result = f(&socket);
        *guard = Some(socket);
        result
    }
}

impl MessageSink for UdpSender {
    fn send(&self, target: &RemoteTarget, message: &OscMessage) -> Result<()> {
        let addr = target.resolve()?;
        let bytes = message.encode();
        let sent = self.with_socket(|socket| Ok(socket.send_to(&bytes, addr)?))?;
        if sent != bytes.len() {
            return Err(Error::ShortSend {
                sent,
                len: bytes.len(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for UdpSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpSender")
            .field("bound", &self.socket.lock().is_some())
            .finish()
    }
}
