//! Output frame: named numeric channels handed back to the host each tick.

use wekbridge_net::{Drained, OscArg};

/// Prefix of the channels built from the primary output address.
pub const PRIMARY_PREFIX: &str = "output";
/// Prefix of the per-index event channels.
pub const EVENT_PREFIX: &str = "dtw_event_";

#[derive(Debug, Clone, PartialEq)]
pub struct OutputChannel {
    pub name: String,
    pub value: f32,
}

/// One sample per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFrame {
    pub channels: Vec<OutputChannel>,
    pub num_samples: usize,
    pub sample_rate: f64,
}

impl OutputFrame {
    pub fn empty(sample_rate: f64) -> Self {
        Self {
            channels: Vec::new(),
            num_samples: 1,
            sample_rate,
        }
    }

    /// Build the frame from a drained snapshot.
    ///
    /// Channel numbers are 1-based argument positions; a string argument that
    /// is not numeric produces no channel but keeps its number.
    pub fn from_drained(drained: &Drained, sample_rate: f64) -> Self {
        let mut frame = Self::empty(sample_rate);

        frame.push_values(PRIMARY_PREFIX, &drained.primary);
        for (address, args) in &drained.others {
            frame.push_values(&channel_stem(address), args);
        }
        for index in &drained.events {
            frame.channels.push(OutputChannel {
                name: format!("{}{}", EVENT_PREFIX, index),
                value: 1.0,
            });
        }

        frame
    }

    fn push_values(&mut self, prefix: &str, args: &[OscArg]) {
        for (position, arg) in args.iter().enumerate() {
            if let Some(value) = arg.as_f32() {
                self.channels.push(OutputChannel {
                    name: format!("{}{}", prefix, position + 1),
                    value,
                });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.channels
            .iter()
            .find(|channel| channel.name == name)
            .map(|channel| channel.value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|channel| channel.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Channel name stem for an address: `/` becomes `_`, outer `_` trimmed.
pub fn channel_stem(address: &str) -> String {
    address.replace('/', "_").trim_matches('_').to_string()
}
