//! OSC message layout: address block, type tag block, argument data.

use crate::arg::OscArg;
use crate::error::{CodecError, Result};
use smallvec::SmallVec;
use tracing::trace;

const ARGS_STACK_CAPACITY: usize = 8;

pub type OscArgs = SmallVec<[OscArg; ARGS_STACK_CAPACITY]>;

/// An OSC message: address path plus ordered arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    pub address: String,
    pub args: OscArgs,
}

impl OscMessage {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            args: OscArgs::new(),
        }
    }

    pub fn with_args<I, A>(address: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OscArg>,
    {
        Self {
            address: address.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<OscArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Type tags without the leading comma, e.g. `"ffi"`.
    pub fn type_tags(&self) -> String {
        self.args.iter().map(OscArg::tag).collect()
    }

    pub fn encoded_len(&self) -> usize {
        let data: usize = self
            .args
            .iter()
            .map(|arg| match arg {
                OscArg::Float(_) | OscArg::Int(_) => 4,
                OscArg::Str(s) => padded(s.len() + 1),
            })
            .sum();
        padded(self.address.len() + 1) + padded(self.args.len() + 2) + data
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        write_padded_str(&mut out, self.address.as_bytes());

        out.push(b',');
        out.extend(self.args.iter().map(|arg| arg.tag() as u8));
        out.push(0);
        pad_to_4(&mut out);

        for arg in &self.args {
            match arg {
                OscArg::Float(v) => out.extend_from_slice(&v.to_be_bytes()),
                OscArg::Int(v) => out.extend_from_slice(&v.to_be_bytes()),
                OscArg::Str(s) => write_padded_str(&mut out, s.as_bytes()),
            }
        }
        out
    }

    /// Decode one message, reporting why the packet was rejected.
    ///
    /// An unrecognised type tag stops decoding: the message is returned with
    /// the arguments read before it, since the width of the unknown field
    /// (and so every later offset) cannot be known.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let addr_end = find_nul(bytes, 0).ok_or(CodecError::MissingAddressTerminator)?;
        if addr_end == 0 {
            return Err(CodecError::EmptyAddress);
        }
        let address = utf8_at(bytes, 0, addr_end)?.to_owned();

        let tags_start = padded(addr_end + 1);
        if bytes.get(tags_start) != Some(&b',') {
            return Err(CodecError::MissingTypeTags);
        }
        let tags_end = find_nul(bytes, tags_start).ok_or(CodecError::MissingTypeTagTerminator)?;
        let tags = &bytes[tags_start + 1..tags_end];

        let mut offset = padded(tags_end + 1);
        let mut args = OscArgs::new();

        for &tag in tags {
            match tag {
                b'f' => {
                    let raw = read_word(bytes, offset, 'f')?;
                    args.push(OscArg::Float(f32::from_be_bytes(raw)));
                    offset += 4;
                }
                b'i' => {
                    let raw = read_word(bytes, offset, 'i')?;
                    args.push(OscArg::Int(i32::from_be_bytes(raw)));
                    offset += 4;
                }
                b's' => {
                    let end = find_nul(bytes, offset)
                        .ok_or(CodecError::UnterminatedString { offset })?;
                    args.push(OscArg::Str(utf8_at(bytes, offset, end)?.to_owned()));
                    offset = padded(end + 1);
                }
                other => {
                    trace!(
                        address = %address,
                        tag = %char::from(other),
                        "unsupported OSC type tag, dropping remaining arguments"
                    );
                    break;
                }
            }
        }

        Ok(Self { address, args })
    }
}

/// Encode `address` and `args` into a wire payload.
pub fn encode(address: &str, args: &[OscArg]) -> Vec<u8> {
    OscMessage {
        address: address.to_owned(),
        args: args.iter().cloned().collect(),
    }
    .encode()
}

/// Decode a wire payload. Malformed input yields `None`, never a panic.
pub fn decode(bytes: &[u8]) -> Option<OscMessage> {
    match OscMessage::from_bytes(bytes) {
        Ok(msg) => Some(msg),
        Err(e) => {
            trace!("discarding malformed OSC packet ({} bytes): {}", bytes.len(), e);
            None
        }
    }
}

#[inline]
fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn pad_to_4(out: &mut Vec<u8>) {
    out.resize(padded(out.len()), 0);
}

/// NUL-terminate then pad.
fn write_padded_str(out: &mut Vec<u8>, s: &[u8]) {
    out.extend_from_slice(s);
    out.push(0);
    pad_to_4(out);
}

fn find_nul(bytes: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == 0)
        .map(|pos| from + pos)
}

fn utf8_at(bytes: &[u8], start: usize, end: usize) -> Result<&str> {
    std::str::from_utf8(&bytes[start..end]).map_err(|_| CodecError::InvalidUtf8 { offset: start })
}

fn read_word(bytes: &[u8], offset: usize, tag: char) -> Result<[u8; 4]> {
    bytes
        .get(offset..offset + 4)
        .and_then(|s| s.try_into().ok())
        .ok_or(CodecError::Truncated { tag, offset })
}
