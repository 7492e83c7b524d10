//! Test helpers for wekbridge integration tests
//!
//! All traffic stays on localhost. A plain UDP socket stands in for the
//! Wekinator service on the sending side.

use std::net::UdpSocket;
use std::thread;
use std::time::{Duration, Instant};
use wekbridge::{BridgeConfig, OscMessage};

/// How long a test waits for a datagram to show up.
pub const RECEIVE_TIMEOUT: Duration = Duration::from_secs(2);

/// Install a test-friendly subscriber once; `RUST_LOG` controls the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A port that was free a moment ago.
pub fn free_port() -> u16 {
    UdpSocket::bind("127.0.0.1:0")
        .and_then(|socket| socket.local_addr())
        .map(|addr| addr.port())
        .expect("Failed to find a free UDP port")
}

/// True when a plain (non-reusing) socket can take the port, i.e. nothing
/// else holds it.
pub fn port_is_free(port: u16) -> bool {
    UdpSocket::bind(("0.0.0.0", port)).is_ok()
}

pub fn send_datagram(port: u16, message: &OscMessage) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("Failed to bind test sender");
    socket
        .send_to(&message.encode(), ("127.0.0.1", port))
        .expect("Failed to send test datagram");
}

/// Stand-in for the remote service: records whatever the bridge sends.
pub struct FakeService {
    socket: UdpSocket,
}

impl FakeService {
    pub fn bind() -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").expect("Failed to bind fake service");
        socket
            .set_read_timeout(Some(RECEIVE_TIMEOUT))
            .expect("Failed to set read timeout");
        Self { socket }
    }

    pub fn port(&self) -> u16 {
        self.socket.local_addr().unwrap().port()
    }

    /// Next decodable message, or `None` on timeout.
    pub fn recv(&self) -> Option<OscMessage> {
        let mut buf = [0u8; 1024];
        let (len, _) = self.socket.recv_from(&mut buf).ok()?;
        wekbridge::osc::decode(&buf[..len])
    }
}

/// Config pointing at `service` and listening on `listen_port`.
pub fn test_config(listen_port: u16, service: &FakeService) -> BridgeConfig {
    BridgeConfig {
        listen_port,
        remote_host: "127.0.0.1".to_string(),
        remote_port: service.port(),
        ..Default::default()
    }
}

/// Poll `condition` until it holds or the timeout passes.
pub fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + RECEIVE_TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}
