//! Static service registration tables.
//!
//! A service is a destination byte plus a table of commands. Tables are
//! declared as statics by the crate that owns the service and handed to
//! [`crate::CommandRegistry`] at startup, which validates them once.

use devframe_codec::{Frame, OpCode};

use crate::args::{ArgSpec, ArgValue};
use crate::error::Result;

/// Which request operation a command is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Sent as a SET request (changes device state).
    Set,
    /// Sent as a GET request (reads device state).
    Get,
}

impl Direction {
    /// The request operation for this direction.
    pub fn op_code(self) -> OpCode {
        match self {
            Direction::Set => OpCode::Set,
            Direction::Get => OpCode::Get,
        }
    }
}

/// Builds a request frame from caller-supplied arguments.
pub type BuildFn = fn(&[ArgValue]) -> Result<Frame>;

/// Renders one branch (RES or ERR) of a command's response.
pub type ParseFn = fn(&Frame) -> Result<String>;

/// One command in a service's registration table.
///
/// `identity` and `direction` say what goes in the request header, `args`
/// declares the builder's parameters, and the optional parsers override
/// the generic body rendering for each response branch.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub identity: u8,
    pub direction: Direction,
    pub summary: &'static str,
    pub args: &'static [ArgSpec],
    pub build: BuildFn,
    pub parse_res: Option<ParseFn>,
    pub parse_err: Option<ParseFn>,
}

/// A device service and its command table.
#[derive(Debug, Clone, Copy)]
pub struct ServiceDescriptor {
    pub name: &'static str,
    /// Destination byte that routes frames to this service.
    pub destination: u8,
    pub commands: &'static [CommandSpec],
}
