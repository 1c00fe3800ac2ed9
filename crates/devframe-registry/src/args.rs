//! Builder argument descriptions and values.
//!
//! Command builders are plain function pointers, so their arguments travel
//! as a uniform value list. [`ArgSpec`] describes what a builder expects
//! (front-ends render prompts from it); [`ArgValue`] carries what the
//! caller supplied. The registry checks the two against each other before
//! any builder runs.

use std::fmt;

use devframe_codec::Frame;

use crate::error::{RegistryError, Result};

/// The kinds a builder argument can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Signed integer. Individual builders enforce their field ranges.
    Int,
    /// Free-form text.
    Text,
    /// True/false flag.
    Bool,
    /// A complete command frame, e.g. one to embed in another body.
    Frame,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::Int => "int",
            ArgKind::Text => "text",
            ArgKind::Bool => "bool",
            ArgKind::Frame => "frame",
        };
        f.write_str(name)
    }
}

/// One declared argument of a command builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
}

impl ArgSpec {
    pub const fn new(name: &'static str, kind: ArgKind) -> Self {
        Self { name, kind }
    }
}

/// One supplied argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Int(i64),
    Text(String),
    Bool(bool),
    Frame(Frame),
}

impl ArgValue {
    pub fn kind(&self) -> ArgKind {
        match self {
            ArgValue::Int(_) => ArgKind::Int,
            ArgValue::Text(_) => ArgKind::Text,
            ArgValue::Bool(_) => ArgKind::Bool,
            ArgValue::Frame(_) => ArgKind::Frame,
        }
    }

    pub fn as_int(&self, name: &str) -> Result<i64> {
        match self {
            ArgValue::Int(value) => Ok(*value),
            other => Err(mismatch(name, ArgKind::Int, other.kind())),
        }
    }

    pub fn as_text(&self, name: &str) -> Result<&str> {
        match self {
            ArgValue::Text(value) => Ok(value),
            other => Err(mismatch(name, ArgKind::Text, other.kind())),
        }
    }

    pub fn as_bool(&self, name: &str) -> Result<bool> {
        match self {
            ArgValue::Bool(value) => Ok(*value),
            other => Err(mismatch(name, ArgKind::Bool, other.kind())),
        }
    }

    pub fn as_frame(&self, name: &str) -> Result<&Frame> {
        match self {
            ArgValue::Frame(value) => Ok(value),
            other => Err(mismatch(name, ArgKind::Frame, other.kind())),
        }
    }
}

/// Fetch argument `index` from a builder's value list.
pub fn arg<'a>(args: &'a [ArgValue], index: usize, name: &str) -> Result<&'a ArgValue> {
    args.get(index)
        .ok_or_else(|| RegistryError::InvalidArgument {
            reason: format!("missing argument {index} ({name})"),
        })
}

/// Narrow an integer argument to `u8`, the width of most wire fields.
pub fn as_u8(value: i64, name: &str) -> Result<u8> {
    u8::try_from(value).map_err(|_| RegistryError::InvalidArgument {
        reason: format!("argument {name}: {value} does not fit 0..=255"),
    })
}

fn mismatch(name: &str, expected: ArgKind, actual: ArgKind) -> RegistryError {
    RegistryError::InvalidArgument {
        reason: format!("argument {name}: expected {expected}, got {actual}"),
    }
}
