//! OSC argument values.

use std::fmt;

/// A single OSC argument. Only the three scalar kinds Wekinator uses are
/// supported.
#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    Float(f32),
    Int(i32),
    Str(String),
}

impl OscArg {
    /// Type tag character for this argument (`f`, `i` or `s`).
    #[inline]
    pub fn tag(&self) -> char {
        match self {
            OscArg::Float(_) => 'f',
            OscArg::Int(_) => 'i',
            OscArg::Str(_) => 's',
        }
    }

    /// Numeric view of the argument.
    ///
    /// Ints widen to `f32`; strings are parsed and yield `None` when they
    /// are not numeric.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            OscArg::Float(v) => Some(*v),
            OscArg::Int(v) => Some(*v as f32),
            OscArg::Str(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            OscArg::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OscArg::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f32> for OscArg {
    fn from(v: f32) -> Self {
        OscArg::Float(v)
    }
}

impl From<i32> for OscArg {
    fn from(v: i32) -> Self {
        OscArg::Int(v)
    }
}

impl From<&str> for OscArg {
    fn from(v: &str) -> Self {
        OscArg::Str(v.to_owned())
    }
}

impl From<String> for OscArg {
    fn from(v: String) -> Self {
        OscArg::Str(v)
    }
}

impl fmt::Display for OscArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OscArg::Float(v) => write!(f, "{v}"),
            OscArg::Int(v) => write!(f, "{v}"),
            OscArg::Str(s) => write!(f, "{s:?}"),
        }
    }
}
