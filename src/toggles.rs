//! Edge detection for the record / train / run toggles.

use crate::commands::{
    CANCEL_TRAIN, START_RECORDING, START_RUNNING, STOP_RECORDING, STOP_RUNNING, TRAIN,
};
use crate::config::BridgeConfig;
use smallvec::SmallVec;

/// Last toggle values a command was sent for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleState {
    pub recording: bool,
    pub trained: bool,
    pub running: bool,
}

impl ToggleState {
    /// Adopt the config's toggle values and return the command address for
    /// each one that changed, in order recording, trained, running.
    pub fn reconcile(&mut self, config: &BridgeConfig) -> SmallVec<[&'static str; 3]> {
        let mut commands = SmallVec::new();

        if let Some(on) = changed(&mut self.recording, config.record) {
            commands.push(if on { START_RECORDING } else { STOP_RECORDING });
        }
        if let Some(on) = changed(&mut self.trained, config.train) {
            commands.push(if on { TRAIN } else { CANCEL_TRAIN });
        }
        if let Some(on) = changed(&mut self.running, config.run) {
            commands.push(if on { START_RUNNING } else { STOP_RUNNING });
        }

        commands
    }
}

fn changed(stored: &mut bool, requested: bool) -> Option<bool> {
    if *stored == requested {
        return None;
    }
    *stored = requested;
    Some(requested)
}
