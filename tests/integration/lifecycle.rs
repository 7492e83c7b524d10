//! Listener lifecycle: start on first tick, rebind on port change, release on
//! shutdown and drop.

use crate::helpers::*;
use std::net::UdpSocket;
use wekbridge::net::Error as NetError;
use wekbridge::{Bridge, Error, OscMessage};

#[test]
fn test_first_tick_binds_configured_port() {
    init_tracing();
    let service = FakeService::bind();
    let port = free_port();

    let mut bridge = Bridge::with_udp();
    assert!(!bridge.is_listening());

    bridge.tick(&test_config(port, &service), None);
    assert!(bridge.is_listening());
    assert_eq!(bridge.listening_port(), Some(port));
    assert!(bridge.last_error().is_none());
    assert!(!port_is_free(port));
}

#[test]
fn test_port_change_rebinds() {
    init_tracing();
    let service = FakeService::bind();
    let first = free_port();
    let second = loop {
        let port = free_port();
        if port != first {
            break port;
        }
    };

    let mut bridge = Bridge::with_udp();
    bridge.tick(&test_config(first, &service), None);
    assert_eq!(bridge.listening_port(), Some(first));

    let config = test_config(second, &service);
    bridge.tick(&config, None);
    assert_eq!(bridge.listening_port(), Some(second));
    assert!(port_is_free(first));

    send_datagram(second, &OscMessage::with_args("/wek/outputs", [0.9f32]));
    assert!(wait_for(|| bridge.tick(&config, None).get("output1").is_some()));
}

#[test]
fn test_shutdown_releases_port_and_next_tick_restarts() {
    init_tracing();
    let service = FakeService::bind();
    let port = free_port();
    let config = test_config(port, &service);

    let mut bridge = Bridge::with_udp();
    bridge.tick(&config, None);
    bridge.shutdown();
    bridge.shutdown();

    assert!(!bridge.is_listening());
    assert!(port_is_free(port));

    bridge.tick(&config, None);
    assert_eq!(bridge.listening_port(), Some(port));
}

#[test]
fn test_drop_releases_port() {
    init_tracing();
    let service = FakeService::bind();
    let port = free_port();

    {
        let mut bridge = Bridge::with_udp();
        bridge.tick(&test_config(port, &service), None);
        assert!(!port_is_free(port));
    }

    assert!(port_is_free(port));
}

/// A taken port leaves the bridge without a listener but ticking; the bind is
/// retried every tick and succeeds once the port is free.
#[test]
fn test_bind_failure_is_reported_and_retried() {
    init_tracing();
    let service = FakeService::bind();
    let port = free_port();
    let config = test_config(port, &service);

    let blocker = UdpSocket::bind(("0.0.0.0", port)).expect("Failed to occupy port");

    let mut bridge = Bridge::with_udp();
    let frame = bridge.tick(&config, Some(&[0.5, 1.2]));
    assert!(frame.is_empty());
    assert!(!bridge.is_listening());
    assert_eq!(bridge.listening_port(), None);
    assert!(matches!(
        bridge.last_error(),
        Some(Error::Net(NetError::Bind { port: p, .. })) if *p == port
    ));

    // still blocked: stays down, error kept
    bridge.tick(&config, None);
    assert!(!bridge.is_listening());
    assert!(bridge.last_error().is_some());

    drop(blocker);
    bridge.tick(&config, None);
    assert_eq!(bridge.listening_port(), Some(port));
    assert!(bridge.last_error().is_none());
}
