//! Cycle tests: what a tick sends and what it hands back.

use crate::helpers::*;
use approx::assert_relative_eq;
use wekbridge::commands::{START_RECORDING, START_RUNNING, STOP_RUNNING};
use wekbridge::{Bridge, OscArg, OscMessage, OutputFrame, Pulse, SendMode};

/// Tick until `done` accepts the collected frames or the timeout passes.
fn tick_until(
    bridge: &mut Bridge,
    config: &wekbridge::BridgeConfig,
    mut done: impl FnMut(&[OutputFrame]) -> bool,
) -> Vec<OutputFrame> {
    let mut frames = Vec::new();
    wait_for(|| {
        frames.push(bridge.tick(config, None));
        done(&frames)
    });
    frames
}

/// Inputs and toggle edges reach the service in tick order.
#[test]
fn test_tick_sends_toggles_then_inputs() {
    init_tracing();
    let service = FakeService::bind();
    let mut config = test_config(free_port(), &service);
    config.record = true;
    config.run = true;

    let mut bridge = Bridge::with_udp();
    bridge.tick(&config, Some(&[0.5, 1.2]));

    assert_eq!(service.recv().unwrap().address, START_RECORDING);
    assert_eq!(service.recv().unwrap().address, START_RUNNING);

    let inputs = service.recv().unwrap();
    assert_eq!(inputs.address, "/wek/inputs");
    assert_eq!(inputs.type_tags(), "ff");
    assert_relative_eq!(inputs.args[0].as_f32().unwrap(), 0.5);
    assert_relative_eq!(inputs.args[1].as_f32().unwrap(), 1.2);

    config.run = false;
    config.send_mode = SendMode::OnPulse;
    bridge.tick(&config, Some(&[0.5, 1.2]));
    assert_eq!(service.recv().unwrap().address, STOP_RUNNING);

    assert!(bridge.pulse(Pulse::DeleteOutputExamples, &config, None));
    let command = service.recv().unwrap();
    assert_eq!(command.address, "/wekinator/control/deleteExamplesForOutput");
    assert_eq!(command.args.as_slice(), &[OscArg::Int(1)]);
}

/// Values sent to the listener show up on the following tick; an event shows
/// up exactly once.
#[test]
fn test_inbound_datagrams_reach_frame() {
    init_tracing();
    let service = FakeService::bind();
    let port = free_port();
    let config = test_config(port, &service);

    let mut bridge = Bridge::with_udp();
    bridge.tick(&config, None);
    assert_eq!(bridge.listening_port(), Some(port));

    send_datagram(port, &OscMessage::with_args("/wek/outputs", [0.3f32, 0.6]));
    send_datagram(port, &OscMessage::new("/wek/extra").arg("7.5"));
    send_datagram(port, &OscMessage::new("/output_1"));

    let frames = tick_until(&mut bridge, &config, |frames| {
        let values_in = frames
            .last()
            .is_some_and(|f| f.get("output2").is_some() && f.get("wek_extra1").is_some());
        let event_seen = frames.iter().any(|f| f.get("dtw_event_1").is_some());
        values_in && event_seen
    });

    let last = frames.last().unwrap();
    assert_relative_eq!(last.get("output1").unwrap(), 0.3);
    assert_relative_eq!(last.get("output2").unwrap(), 0.6);
    assert_relative_eq!(last.get("wek_extra1").unwrap(), 7.5);
    assert_eq!(last.sample_rate, config.sample_rate);

    let event_frames = frames
        .iter()
        .filter(|f| f.get("dtw_event_1") == Some(1.0))
        .count();
    assert_eq!(event_frames, 1);

    // level-held values, cleared events
    let next = bridge.tick(&config, None);
    assert_relative_eq!(next.get("output1").unwrap(), 0.3);
    assert_eq!(next.get("dtw_event_1"), None);
}

/// An unreachable service never disturbs the cycle.
#[test]
fn test_unresolvable_remote_is_ignored() {
    init_tracing();
    let service = FakeService::bind();
    let port = free_port();
    let mut config = test_config(port, &service);
    config.remote_host = "not a host name".to_string();
    config.train = true;

    let mut bridge = Bridge::with_udp();
    for _ in 0..3 {
        let frame = bridge.tick(&config, Some(&[1.0, 2.0]));
        assert!(frame.is_empty());
    }
    assert!(bridge.pulse(Pulse::CancelTrain, &config, None));
    assert!(bridge.toggles().trained);
    assert!(bridge.is_listening());
}
