//! Header byte packing.
//!
//! The third byte of every frame carries the operation in its top two bits
//! and the command identity in the low six. All bit masking lives here so
//! call sites deal in typed values only.

use std::fmt;

use crate::error::{FrameError, Result};

/// Mask selecting the operation bits of a header byte.
pub const OP_MASK: u8 = 0b1100_0000;

/// Mask selecting the command identity bits of a header byte.
pub const ID_MASK: u8 = 0b0011_1111;

/// Largest command identity representable in the 6-bit field.
pub const MAX_IDENTITY: u8 = ID_MASK;

/// Frame operation, stored in the two most significant header bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Request that changes device state.
    Set = 0b00,
    /// Request that reads device state.
    Get = 0b01,
    /// Successful response.
    Res = 0b10,
    /// Error response.
    Err = 0b11,
}

impl OpCode {
    /// The operation shifted into wire position.
    pub fn wire_bits(self) -> u8 {
        (self as u8) << 6
    }

    /// Extract the operation from a header byte. Total: two bits always
    /// name an operation.
    pub fn from_header(byte: u8) -> Self {
        match byte >> 6 {
            0b00 => OpCode::Set,
            0b01 => OpCode::Get,
            0b10 => OpCode::Res,
            _ => OpCode::Err,
        }
    }

    /// True for the response-class operations (`Res`, `Err`).
    pub fn is_response(self) -> bool {
        matches!(self, OpCode::Res | OpCode::Err)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpCode::Set => "SET",
            OpCode::Get => "GET",
            OpCode::Res => "RES",
            OpCode::Err => "ERR",
        };
        f.write_str(name)
    }
}

/// Pack an operation and command identity into a header byte.
///
/// Fails with [`FrameError::InvalidHeader`] when `identity` does not fit
/// the 6-bit field.
pub fn pack(op: OpCode, identity: u8) -> Result<u8> {
    if identity > MAX_IDENTITY {
        return Err(FrameError::InvalidHeader { identity });
    }
    Ok(op.wire_bits() | identity)
}

/// Split a header byte into operation and command identity.
pub fn unpack(byte: u8) -> (OpCode, u8) {
    (OpCode::from_header(byte), byte & ID_MASK)
}
