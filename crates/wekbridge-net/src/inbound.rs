//! Shared inbound state between the listener thread and the tick consumer.
//!
//! Two structures behind one lock:
//! - latest argument list per address (overwritten on arrival, never queued)
//! - pending event indices from `.../output_<N>` addresses, coalesced and
//!   cleared by every [`InboundState::drain`]

use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use wekbridge_osc::{OscArgs, OscMessage};

const EVENT_SEGMENT_PREFIX: &str = "output_";

/// Event index carried by an address whose last segment is `output_<N>`.
///
/// Returns `None` when the address is not an event, including when `<N>` is
/// not an integer (`/output_x`); such messages are stored as plain values.
pub fn event_index(address: &str) -> Option<i64> {
    let segment = address.rsplit('/').next()?;
    if !segment.starts_with(EVENT_SEGMENT_PREFIX) {
        return None;
    }
    segment.rsplit_once('_')?.1.parse().ok()
}

/// Snapshot produced by one drain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Drained {
    /// Values of the primary output address (empty if never received).
    pub primary: OscArgs,
    /// Every other address with its latest values, in first-arrival order.
    pub others: Vec<(String, OscArgs)>,
    /// Event indices that arrived since the previous drain, ascending.
    pub events: Vec<i64>,
}

#[derive(Debug, Default)]
struct Inner {
    values: IndexMap<String, OscArgs>,
    pending_events: BTreeSet<i64>,
}

#[derive(Debug, Default)]
pub struct InboundState {
    inner: Mutex<Inner>,
}

impl InboundState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one decoded message. Called from the listener thread.
    pub fn apply(&self, message: OscMessage) {
        let OscMessage { address, args } = message;
        let index = event_index(&address);

        let mut inner = self.inner.lock();
        match index {
            Some(index) => {
                inner.pending_events.insert(index);
            }
            None => {
                inner.values.insert(address, args);
            }
        }
    }

    /// Read every value slot and take the pending events.
    ///
    /// Value slots stay in place (level-held); the event set is emptied, so
    /// an index with no new arrival is absent from the next drain.
    pub fn drain(&self, primary_address: &str) -> Drained {
        let mut inner = self.inner.lock();

        let primary = inner
            .values
            .get(primary_address)
            .cloned()
            .unwrap_or_default();
        let others = inner
            .values
            .iter()
            .filter(|(address, _)| address.as_str() != primary_address)
            .map(|(address, args)| (address.clone(), args.clone()))
            .collect();
        let events = std::mem::take(&mut inner.pending_events)
            .into_iter()
            .collect();

        Drained {
            primary,
            others,
            events,
        }
    }

    /// Latest values stored for `address`.
    pub fn value(&self, address: &str) -> Option<OscArgs> {
        self.inner.lock().values.get(address).cloned()
    }

    /// Pending event indices without clearing them.
    pub fn pending_events(&self) -> Vec<i64> {
        self.inner.lock().pending_events.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wekbridge_osc::OscArg;

    fn floats(address: &str, values: &[f32]) -> OscMessage {
        OscMessage::with_args(address, values.iter().copied())
    }

    #[test]
    fn test_event_index_parsing() {
        assert_eq!(event_index("/output_1"), Some(1));
        assert_eq!(event_index("/wek/output_12"), Some(12));
        assert_eq!(event_index("/output_x"), None);
        assert_eq!(event_index("/output_"), None);
        assert_eq!(event_index("/wek/outputs"), None);
        assert_eq!(event_index("/output_1/values"), None);
    }

    #[test]
    fn test_latest_value_wins() {
        let state = InboundState::new();
        state.apply(floats("/wek/outputs", &[0.1, 0.2]));
        state.apply(floats("/wek/outputs", &[0.9]));

        let drained = state.drain("/wek/outputs");
        assert_eq!(drained.primary.as_slice(), &[OscArg::Float(0.9)]);
        assert!(drained.others.is_empty());
    }

    #[test]
    fn test_values_are_level_held() {
        let state = InboundState::new();
        state.apply(floats("/extra/a", &[1.0]));

        assert_eq!(state.drain("/wek/outputs").others.len(), 1);
        assert_eq!(state.drain("/wek/outputs").others.len(), 1);
        assert!(state.drain("/wek/outputs").primary.is_empty());
    }

    #[test]
    fn test_others_keep_arrival_order() {
        let state = InboundState::new();
        state.apply(floats("/b", &[1.0]));
        state.apply(floats("/a", &[2.0]));
        state.apply(floats("/b", &[3.0]));

        let names: Vec<_> = state
            .drain("/wek/outputs")
            .others
            .into_iter()
            .map(|(address, _)| address)
            .collect();
        assert_eq!(names, vec!["/b", "/a"]);
    }

    #[test]
    fn test_events_coalesce_and_clear() {
        let state = InboundState::new();
        state.apply(OscMessage::new("/output_2"));
        state.apply(OscMessage::new("/output_2"));
        state.apply(OscMessage::new("/output_1"));
        assert_eq!(state.pending_events(), vec![1, 2]);

        let first = state.drain("/wek/outputs");
        assert_eq!(first.events, vec![1, 2]);
        assert!(state.pending_events().is_empty());

        let second = state.drain("/wek/outputs");
        assert!(second.events.is_empty());
    }

    #[test]
    fn test_malformed_event_index_stored_as_value() {
        let state = InboundState::new();
        state.apply(floats("/output_x", &[5.0]));

        assert!(state.pending_events().is_empty());
        assert_eq!(
            state.value("/output_x").unwrap().as_slice(),
            &[OscArg::Float(5.0)]
        );
    }

    #[test]
    fn test_concurrent_writer() {
        let state = Arc::new(InboundState::new());
        let writer = {
            let state = Arc::clone(&state);
            std::thread::spawn(move || {
                for i in 0..1000 {
                    state.apply(floats("/wek/outputs", &[i as f32]));
                    state.apply(OscMessage::new(format!("/output_{}", i % 4)));
                }
            })
        };

        let mut seen = BTreeSet::new();
        for _ in 0..100 {
            seen.extend(state.drain("/wek/outputs").events);
        }
        writer.join().unwrap();
        seen.extend(state.drain("/wek/outputs").events);

        assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(
            state.value("/wek/outputs").unwrap().as_slice(),
            &[OscArg::Float(999.0)]
        );
    }
}
