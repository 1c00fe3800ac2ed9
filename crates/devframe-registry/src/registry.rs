use std::collections::HashMap;

use devframe_codec::{Frame, FrameError, OpCode, MAX_IDENTITY};
use tracing::warn;

use crate::args::ArgValue;
use crate::error::{RegistryError, Result};
use crate::service::{CommandSpec, ServiceDescriptor};

/// Response branch a parsed frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// RES: the device accepted the command.
    Result,
    /// ERR: the device rejected it.
    Error,
}

impl ResponseClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseClass::Result => "result",
            ResponseClass::Error => "error",
        }
    }
}

/// Outcome of parsing a response frame against its originating command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub class: ResponseClass,
    /// Human-readable rendering from the command's parser, or the generic
    /// fallback when the command declares none.
    pub rendered: String,
}

/// Name-keyed lookup over service command tables.
///
/// Built once at startup from static descriptors and never mutated after:
/// lookups take `&self` and the registry is `Send + Sync` for free.
pub struct CommandRegistry {
    services: HashMap<&'static str, &'static ServiceDescriptor>,
}

impl CommandRegistry {
    /// Build a registry from service tables.
    ///
    /// Rejects duplicate service names, duplicate command names within a
    /// service, identity+direction pairs shared by two commands (the
    /// device would answer both with the same response header), and
    /// identities too wide for the header field. Failing here keeps bad
    /// tables out of the send path entirely.
    pub fn with_services(descriptors: &[&'static ServiceDescriptor]) -> Result<Self> {
        let mut services = HashMap::new();
        for descriptor in descriptors {
            validate_table(descriptor)?;
            if services.insert(descriptor.name, *descriptor).is_some() {
                return Err(RegistryError::DuplicateService {
                    service: descriptor.name.to_string(),
                });
            }
        }
        Ok(Self { services })
    }

    /// All registered services, name-sorted.
    pub fn services(&self) -> Vec<&'static ServiceDescriptor> {
        let mut all: Vec<_> = self.services.values().copied().collect();
        all.sort_by_key(|descriptor| descriptor.name);
        all
    }

    /// Look up a service by name.
    pub fn service(&self, service: &str) -> Result<&'static ServiceDescriptor> {
        self.services
            .get(service)
            .copied()
            .ok_or_else(|| RegistryError::UnknownService {
                service: service.to_string(),
            })
    }

    /// Look up one command.
    pub fn command(&self, service: &str, command: &str) -> Result<&'static CommandSpec> {
        self.service(service)?
            .commands
            .iter()
            .find(|spec| spec.name == command)
            .ok_or_else(|| RegistryError::UnknownCommand {
                service: service.to_string(),
                command: command.to_string(),
            })
    }

    /// Build a request frame for `service`/`command`.
    ///
    /// The supplied values are checked against the command's declared
    /// argument list before its builder runs.
    pub fn build(&self, service: &str, command: &str, args: &[ArgValue]) -> Result<Frame> {
        let spec = self.command(service, command)?;
        check_args(spec, args)?;
        (spec.build)(args)
    }

    /// Parse a response frame against the command that originated it.
    ///
    /// The wire carries no request/response pairing, so the caller names
    /// the originating command. The response class comes from the top two
    /// header bits; a request-class operation there is an
    /// [`RegistryError::UnexpectedOperation`]. A response whose identity
    /// disagrees with the originating command is logged, then parsed under
    /// the caller's pairing anyway.
    pub fn parse(&self, service: &str, command: &str, response: &Frame) -> Result<ParsedResponse> {
        let spec = self.command(service, command)?;
        let (class, parser) = match response.operation() {
            OpCode::Res => (ResponseClass::Result, spec.parse_res),
            OpCode::Err => (ResponseClass::Error, spec.parse_err),
            operation => return Err(RegistryError::UnexpectedOperation { operation }),
        };
        if response.identity() != spec.identity {
            warn!(
                service,
                command,
                expected = spec.identity,
                received = response.identity(),
                "response identity does not match originating command"
            );
        }
        let rendered = match parser {
            Some(parse) => parse(response)?,
            None => match class {
                ResponseClass::Result => generic_result(response)?,
                ResponseClass::Error => generic_error(response)?,
            },
        };
        Ok(ParsedResponse { class, rendered })
    }
}

/// Fallback RES rendering: the raw response body as hex.
pub fn generic_result(response: &Frame) -> Result<String> {
    Ok(format!("result (raw body): {}", hex::encode(response.body())))
}

/// Fallback ERR rendering: the raw response body as hex.
pub fn generic_error(response: &Frame) -> Result<String> {
    Ok(format!("error (raw body): {}", hex::encode(response.body())))
}

fn check_args(spec: &CommandSpec, args: &[ArgValue]) -> Result<()> {
    if args.len() != spec.args.len() {
        return Err(RegistryError::InvalidArgument {
            reason: format!(
                "{} takes {} argument(s), got {}",
                spec.name,
                spec.args.len(),
                args.len()
            ),
        });
    }
    for (declared, supplied) in spec.args.iter().zip(args) {
        if supplied.kind() != declared.kind {
            return Err(RegistryError::InvalidArgument {
                reason: format!(
                    "argument {}: expected {}, got {}",
                    declared.name,
                    declared.kind,
                    supplied.kind()
                ),
            });
        }
    }
    Ok(())
}

fn validate_table(descriptor: &ServiceDescriptor) -> Result<()> {
    for (index, spec) in descriptor.commands.iter().enumerate() {
        if spec.identity > MAX_IDENTITY {
            return Err(RegistryError::Frame(FrameError::InvalidHeader {
                identity: spec.identity,
            }));
        }
        for earlier in &descriptor.commands[..index] {
            if earlier.name == spec.name
                || (earlier.identity == spec.identity && earlier.direction == spec.direction)
            {
                return Err(RegistryError::DuplicateCommand {
                    service: descriptor.name.to_string(),
                    command: spec.name.to_string(),
                });
            }
        }
    }
    Ok(())
}
