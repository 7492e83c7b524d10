//! Parameter surface declared to the host.
//!
//! Host glue builds its UI from [`parameters`], writes edited values back with
//! [`BridgeConfig::set_param`], and forwards pulse presses to
//! [`Bridge::pulse`](crate::Bridge::pulse) via [`Pulse::from_name`].

use crate::commands::Pulse;
use crate::config::{
    BridgeConfig, SendMode, DEFAULT_INPUT_ADDRESS, DEFAULT_LISTEN_PORT, DEFAULT_OUTPUT_ADDRESS,
    DEFAULT_REMOTE_HOST, DEFAULT_REMOTE_PORT, MAX_INPUTS,
};
use crate::{Error, Result};

/// Kind, default and UI range of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    Float { min: f64, max: f64, default: f64 },
    Int { min: i64, max: i64, default: i64 },
    Str { default: &'static str },
    Menu {
        names: &'static [&'static str],
        labels: &'static [&'static str],
    },
    Toggle,
    Pulse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub page: &'static str,
    pub kind: ParamKind,
}

impl ParameterSpec {
    const fn new(
        page: &'static str,
        name: &'static str,
        label: &'static str,
        kind: ParamKind,
    ) -> Self {
        Self {
            name,
            label,
            page,
            kind,
        }
    }

    /// The one-shot action behind a pulse parameter.
    pub fn pulse(&self) -> Option<Pulse> {
        match self.kind {
            ParamKind::Pulse => Pulse::from_name(self.name),
            _ => None,
        }
    }
}

/// A value written by the host into a non-pulse parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Float(f64),
    Int(i64),
    Str(String),
    Toggle(bool),
    /// Index into a menu's `names`.
    Menu(usize),
}

const SEND_MODE_NAMES: &[&str] = &["Automatic", "Manual"];
const SEND_MODE_LABELS: &[&str] = &["Every Frame", "On Pulse"];

#[rustfmt::skip]
static PARAMETERS: [ParameterSpec; 29] = [
    ParameterSpec::new("General", "Samplerate", "Sample Rate", ParamKind::Float { min: 30.0, max: 120.0, default: 60.0 }),
    ParameterSpec::new("General", "Numinputs", "Number of Inputs", ParamKind::Int { min: 1, max: MAX_INPUTS as i64, default: 2 }),
    ParameterSpec::new("OSC", "Listenport", "Listening Port", ParamKind::Int { min: 1, max: 65535, default: DEFAULT_LISTEN_PORT as i64 }),
    ParameterSpec::new("OSC", "Remotehost", "Wekinator Host", ParamKind::Str { default: DEFAULT_REMOTE_HOST }),
    ParameterSpec::new("OSC", "Remoteport", "Wekinator Port", ParamKind::Int { min: 1, max: 65535, default: DEFAULT_REMOTE_PORT as i64 }),
    ParameterSpec::new("OSC", "Inputmessage", "Input OSC Address", ParamKind::Str { default: DEFAULT_INPUT_ADDRESS }),
    ParameterSpec::new("OSC", "Outputmessage", "Main Output OSC Address", ParamKind::Str { default: DEFAULT_OUTPUT_ADDRESS }),
    ParameterSpec::new("Input Sending", "Sendingmode", "Mode", ParamKind::Menu { names: SEND_MODE_NAMES, labels: SEND_MODE_LABELS }),
    ParameterSpec::new("Input Sending", "Sendnow", "Send Input Now", ParamKind::Pulse),
    ParameterSpec::new("Control", "Record", "Record Examples", ParamKind::Toggle),
    ParameterSpec::new("Control", "Train", "Train Model", ParamKind::Toggle),
    ParameterSpec::new("Control", "Run", "Run Models", ParamKind::Toggle),
    ParameterSpec::new("Control", "Canceltrain", "Cancel Training", ParamKind::Pulse),
    ParameterSpec::new("DTW Control", "Gestureid", "Gesture ID", ParamKind::Int { min: 1, max: 16, default: 1 }),
    ParameterSpec::new("DTW Control", "Startdtwrecording", "Start DTW Recording", ParamKind::Pulse),
    ParameterSpec::new("DTW Control", "Stopdtwrecording", "Stop DTW Recording", ParamKind::Pulse),
    ParameterSpec::new("Example Management", "Deleteallexamples", "Delete All Examples", ParamKind::Pulse),
    ParameterSpec::new("Example Management", "Targetoutput", "Target Output", ParamKind::Int { min: 1, max: 16, default: 1 }),
    ParameterSpec::new("Example Management", "Deleteoutputexamples", "Delete Examples for Output", ParamKind::Pulse),
    ParameterSpec::new("Example Management", "Setoutputvalues", "Output Values (CSV)", ParamKind::Str { default: "" }),
    ParameterSpec::new("Example Management", "Sendoutputvalues", "Send Output Values", ParamKind::Pulse),
    ParameterSpec::new("Advanced", "Namelist", "Names (CSV)", ParamKind::Str { default: "" }),
    ParameterSpec::new("Advanced", "Setinputnames", "Set Input Names", ParamKind::Pulse),
    ParameterSpec::new("Advanced", "Setoutputnames", "Set Output Names", ParamKind::Pulse),
    ParameterSpec::new("Advanced", "Modellist", "Model Indices (CSV)", ParamKind::Str { default: "" }),
    ParameterSpec::new("Advanced", "Enablemodelrecording", "Enable Model Recording", ParamKind::Pulse),
    ParameterSpec::new("Advanced", "Disablemodelrecording", "Disable Model Recording", ParamKind::Pulse),
    ParameterSpec::new("Advanced", "Enablemodelrunning", "Enable Model Running", ParamKind::Pulse),
    ParameterSpec::new("Advanced", "Disablemodelrunning", "Disable Model Running", ParamKind::Pulse),
];

/// Every parameter, grouped by page in display order.
pub fn parameters() -> &'static [ParameterSpec] {
    &PARAMETERS
}

pub fn parameter(name: &str) -> Option<&'static ParameterSpec> {
    parameters().iter().find(|p| p.name == name)
}

fn type_mismatch(name: &str, value: &ParamValue) -> Error {
    Error::InvalidConfig(format!("parameter '{}' cannot take {:?}", name, value))
}

fn out_of_range<T: std::fmt::Display>(name: &str, value: T, min: T, max: T) -> Error {
    Error::InvalidConfig(format!("{} {} out of range ({}-{})", name, value, min, max))
}

impl ParamKind {
    /// Reject numeric values outside the declared range. Other kinds and
    /// mismatched value types pass through to the typed write.
    fn check_range(&self, name: &str, value: &ParamValue) -> Result<()> {
        match (self, value) {
            (ParamKind::Int { min, max, .. }, ParamValue::Int(v)) if !(*min..=*max).contains(v) => {
                Err(out_of_range(name, *v, *min, *max))
            }
            (ParamKind::Float { min, max, .. }, ParamValue::Float(v))
                if !(*min..=*max).contains(v) =>
            {
                Err(out_of_range(name, *v, *min, *max))
            }
            _ => Ok(()),
        }
    }
}

/// Narrow an already range-checked integer into the config field's type.
fn narrow<T: TryFrom<i64>>(name: &str, value: i64) -> Result<T> {
    T::try_from(value)
        .map_err(|_| Error::InvalidConfig(format!("{} {} does not fit", name, value)))
}

impl BridgeConfig {
    /// Write one host parameter value into the config.
    ///
    /// Numeric values must lie in the declared range, so a config built only
    /// through this surface always passes [`BridgeConfig::validate`].
    pub fn set_param(&mut self, name: &str, value: ParamValue) -> Result<()> {
        if let Some(spec) = parameter(name) {
            spec.kind.check_range(name, &value)?;
        }

        match (name, &value) {
            ("Samplerate", ParamValue::Float(v)) => self.sample_rate = *v,
            ("Numinputs", ParamValue::Int(v)) => self.num_inputs = narrow(name, *v)?,
            ("Listenport", ParamValue::Int(v)) => self.listen_port = narrow(name, *v)?,
            ("Remotehost", ParamValue::Str(s)) => self.remote_host = s.clone(),
            ("Remoteport", ParamValue::Int(v)) => self.remote_port = narrow(name, *v)?,
            ("Inputmessage", ParamValue::Str(s)) => self.input_address = s.clone(),
            ("Outputmessage", ParamValue::Str(s)) => self.output_address = s.clone(),
            ("Sendingmode", ParamValue::Menu(0)) => self.send_mode = SendMode::EveryFrame,
            ("Sendingmode", ParamValue::Menu(1)) => self.send_mode = SendMode::OnPulse,
            ("Record", ParamValue::Toggle(on)) => self.record = *on,
            ("Train", ParamValue::Toggle(on)) => self.train = *on,
            ("Run", ParamValue::Toggle(on)) => self.run = *on,
            ("Gestureid", ParamValue::Int(v)) => self.gesture_id = narrow(name, *v)?,
            ("Targetoutput", ParamValue::Int(v)) => self.target_output = narrow(name, *v)?,
            ("Setoutputvalues", ParamValue::Str(s)) => self.output_values = s.clone(),
            ("Namelist", ParamValue::Str(s)) => self.name_list = s.clone(),
            ("Modellist", ParamValue::Str(s)) => self.model_list = s.clone(),
            _ => {
                return Err(match parameter(name) {
                    Some(_) => type_mismatch(name, &value),
                    None => Error::InvalidConfig(format!("unknown parameter '{}'", name)),
                })
            }
        }
        Ok(())
    }
}
