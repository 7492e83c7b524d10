//! Bridge configuration: the values the host's parameter surface holds.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use wekbridge_net::RemoteTarget;

pub const DEFAULT_LISTEN_PORT: u16 = 12000;
pub const DEFAULT_REMOTE_HOST: &str = "127.0.0.1";
pub const DEFAULT_REMOTE_PORT: u16 = 6448;
pub const DEFAULT_INPUT_ADDRESS: &str = "/wek/inputs";
pub const DEFAULT_OUTPUT_ADDRESS: &str = "/wek/outputs";

pub const MAX_INPUTS: usize = 128;

/// When the input vector is sent to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SendMode {
    /// Every tick that has inputs.
    #[default]
    EveryFrame,
    /// Only on the `SendInputs` pulse.
    OnPulse,
}

/// Host-owned configuration, passed by reference into every bridge call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Output rate reported with each frame (Hz).
    pub sample_rate: f64,
    /// How many leading input values are sent.
    pub num_inputs: usize,

    pub listen_port: u16,
    pub remote_host: String,
    pub remote_port: u16,
    pub input_address: String,
    /// Primary output address; its values become `output1..N`.
    pub output_address: String,

    pub send_mode: SendMode,

    pub record: bool,
    pub train: bool,
    pub run: bool,

    pub gesture_id: u32,
    pub target_output: u32,
    /// Comma-separated floats for `/wekinator/control/outputs`.
    pub output_values: String,
    /// Comma-separated names for input/output naming.
    pub name_list: String,
    /// Comma-separated model indices.
    pub model_list: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            sample_rate: 60.0,
            num_inputs: 2,
            listen_port: DEFAULT_LISTEN_PORT,
            remote_host: DEFAULT_REMOTE_HOST.to_string(),
            remote_port: DEFAULT_REMOTE_PORT,
            input_address: DEFAULT_INPUT_ADDRESS.to_string(),
            output_address: DEFAULT_OUTPUT_ADDRESS.to_string(),
            send_mode: SendMode::EveryFrame,
            record: false,
            train: false,
            run: false,
            gesture_id: 1,
            target_output: 1,
            output_values: String::new(),
            name_list: String::new(),
            model_list: String::new(),
        }
    }
}

impl BridgeConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn remote_target(&self) -> RemoteTarget {
        RemoteTarget::new(self.remote_host.clone(), self.remote_port)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} must be positive",
                self.sample_rate
            )));
        }
        if self.num_inputs == 0 || self.num_inputs > MAX_INPUTS {
            return Err(Error::InvalidConfig(format!(
                "num_inputs {} out of range (1-{})",
                self.num_inputs, MAX_INPUTS
            )));
        }
        if self.listen_port == 0 || self.remote_port == 0 {
            return Err(Error::InvalidConfig("port 0 is not allowed".to_string()));
        }
        if self.remote_host.trim().is_empty() {
            return Err(Error::InvalidConfig("remote_host is empty".to_string()));
        }
        for (name, address) in [
            ("input_address", &self.input_address),
            ("output_address", &self.output_address),
        ] {
            if !address.starts_with('/') {
                return Err(Error::InvalidConfig(format!(
                    "{} '{}' must start with '/'",
                    name, address
                )));
            }
        }
        Ok(())
    }
}
