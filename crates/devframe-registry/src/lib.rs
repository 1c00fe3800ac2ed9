//! Command registration tables and response dispatch.
//!
//! Services declare their commands as static tables: name, header identity,
//! request direction, declared arguments, a builder, and optional response
//! parsers. A [`CommandRegistry`] validates the tables once at startup and
//! then resolves `build` and `parse` calls by name.
//!
//! The wire protocol has no request/response pairing, so `parse` trusts the
//! caller to name the command that originated the response and classifies
//! the frame purely by its operation bits (RES or ERR).

pub mod args;
pub mod error;
pub mod registry;
pub mod service;

pub use args::{arg, as_u8, ArgKind, ArgSpec, ArgValue};
pub use error::{RegistryError, Result};
pub use registry::{generic_error, generic_result, CommandRegistry, ParsedResponse, ResponseClass};
pub use service::{BuildFn, CommandSpec, Direction, ParseFn, ServiceDescriptor};
