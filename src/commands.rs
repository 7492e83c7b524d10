//! One-shot commands and the toggle commands sent on state changes.

use crate::config::BridgeConfig;
use wekbridge_osc::{OscArg, OscArgs, OscMessage};

pub const START_RECORDING: &str = "/wekinator/control/startRecording";
pub const STOP_RECORDING: &str = "/wekinator/control/stopRecording";
pub const TRAIN: &str = "/wekinator/control/train";
pub const CANCEL_TRAIN: &str = "/wekinator/control/cancelTrain";
pub const START_RUNNING: &str = "/wekinator/control/startRunning";
pub const STOP_RUNNING: &str = "/wekinator/control/stopRunning";
pub const DELETE_ALL_EXAMPLES: &str = "/wekinator/control/deleteAllExamples";
pub const DELETE_EXAMPLES_FOR_OUTPUT: &str = "/wekinator/control/deleteExamplesForOutput";
pub const START_DTW_RECORDING: &str = "/wekinator/control/startDtwRecording";
pub const STOP_DTW_RECORDING: &str = "/wekinator/control/stopDtwRecording";
pub const OUTPUTS: &str = "/wekinator/control/outputs";
pub const SET_INPUT_NAMES: &str = "/wekinator/control/setInputNames";
pub const SET_OUTPUT_NAMES: &str = "/wekinator/control/setOutputNames";
pub const ENABLE_MODEL_RECORDING: &str = "/wekinator/control/enableModelRecording";
pub const DISABLE_MODEL_RECORDING: &str = "/wekinator/control/disableModelRecording";
pub const ENABLE_MODEL_RUNNING: &str = "/wekinator/control/enableModelRunning";
pub const DISABLE_MODEL_RUNNING: &str = "/wekinator/control/disableModelRunning";

/// A one-shot action triggered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pulse {
    /// Send the current input vector now (for `SendMode::OnPulse`).
    SendInputs,
    CancelTrain,
    DeleteAllExamples,
    DeleteOutputExamples,
    StartDtwRecording,
    StopDtwRecording,
    SendOutputValues,
    SetInputNames,
    SetOutputNames,
    EnableModelRecording,
    DisableModelRecording,
    EnableModelRunning,
    DisableModelRunning,
}

impl Pulse {
    pub const ALL: [Pulse; 13] = [
        Pulse::SendInputs,
        Pulse::CancelTrain,
        Pulse::DeleteAllExamples,
        Pulse::DeleteOutputExamples,
        Pulse::StartDtwRecording,
        Pulse::StopDtwRecording,
        Pulse::SendOutputValues,
        Pulse::SetInputNames,
        Pulse::SetOutputNames,
        Pulse::EnableModelRecording,
        Pulse::DisableModelRecording,
        Pulse::EnableModelRunning,
        Pulse::DisableModelRunning,
    ];

    /// Host pulse parameter name.
    pub fn name(self) -> &'static str {
        match self {
            Pulse::SendInputs => "Sendnow",
            Pulse::CancelTrain => "Canceltrain",
            Pulse::DeleteAllExamples => "Deleteallexamples",
            Pulse::DeleteOutputExamples => "Deleteoutputexamples",
            Pulse::StartDtwRecording => "Startdtwrecording",
            Pulse::StopDtwRecording => "Stopdtwrecording",
            Pulse::SendOutputValues => "Sendoutputvalues",
            Pulse::SetInputNames => "Setinputnames",
            Pulse::SetOutputNames => "Setoutputnames",
            Pulse::EnableModelRecording => "Enablemodelrecording",
            Pulse::DisableModelRecording => "Disablemodelrecording",
            Pulse::EnableModelRunning => "Enablemodelrunning",
            Pulse::DisableModelRunning => "Disablemodelrunning",
        }
    }

    pub fn from_name(name: &str) -> Option<Pulse> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Fixed protocol address. `None` for [`Pulse::SendInputs`], whose address
    /// is configurable.
    pub fn address(self) -> Option<&'static str> {
        Some(match self {
            Pulse::SendInputs => return None,
            Pulse::CancelTrain => CANCEL_TRAIN,
            Pulse::DeleteAllExamples => DELETE_ALL_EXAMPLES,
            Pulse::DeleteOutputExamples => DELETE_EXAMPLES_FOR_OUTPUT,
            Pulse::StartDtwRecording => START_DTW_RECORDING,
            Pulse::StopDtwRecording => STOP_DTW_RECORDING,
            Pulse::SendOutputValues => OUTPUTS,
            Pulse::SetInputNames => SET_INPUT_NAMES,
            Pulse::SetOutputNames => SET_OUTPUT_NAMES,
            Pulse::EnableModelRecording => ENABLE_MODEL_RECORDING,
            Pulse::DisableModelRecording => DISABLE_MODEL_RECORDING,
            Pulse::EnableModelRunning => ENABLE_MODEL_RUNNING,
            Pulse::DisableModelRunning => DISABLE_MODEL_RUNNING,
        })
    }

    /// Build the message for this pulse from the current config and inputs.
    ///
    /// Returns `None` only for `SendInputs` without inputs.
    pub fn message(self, config: &BridgeConfig, inputs: Option<&[f32]>) -> Option<OscMessage> {
        let Some(address) = self.address() else {
            return inputs.map(|inputs| input_message(config, inputs));
        };

        let args: OscArgs = match self {
            Pulse::DeleteOutputExamples => int_arg(config.target_output),
            Pulse::StartDtwRecording => int_arg(config.gesture_id),
            Pulse::SendOutputValues => parse_float_list(&config.output_values),
            Pulse::SetInputNames | Pulse::SetOutputNames => parse_name_list(&config.name_list),
            Pulse::EnableModelRecording
            | Pulse::DisableModelRecording
            | Pulse::EnableModelRunning
            | Pulse::DisableModelRunning => parse_int_list(&config.model_list),
            _ => OscArgs::new(),
        };

        Some(OscMessage {
            address: address.to_string(),
            args,
        })
    }
}

/// The configured input address carrying the first `num_inputs` values.
pub fn input_message(config: &BridgeConfig, inputs: &[f32]) -> OscMessage {
    let count = inputs.len().min(config.num_inputs);
    OscMessage::with_args(config.input_address.as_str(), inputs[..count].iter().copied())
}

fn int_arg(value: u32) -> OscArgs {
    let mut args = OscArgs::new();
    args.push(OscArg::Int(value.min(i32::MAX as u32) as i32));
    args
}

/// Floats from a comma list; empty or non-numeric entries are skipped.
pub fn parse_float_list(csv: &str) -> OscArgs {
    csv.split(',')
        .filter_map(|item| item.trim().parse::<f32>().ok())
        .map(OscArg::Float)
        .collect()
}

/// Trimmed, non-empty strings from a comma list.
pub fn parse_name_list(csv: &str) -> OscArgs {
    csv.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(OscArg::from)
        .collect()
}

/// Integers from a comma list. Empty entries are ignored; any other
/// unparsable entry drops the whole list, so the command goes out with no
/// arguments.
pub fn parse_int_list(csv: &str) -> OscArgs {
    csv.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.parse::<i32>().map(OscArg::Int))
        .collect::<Result<OscArgs, _>>()
        .unwrap_or_default()
}
