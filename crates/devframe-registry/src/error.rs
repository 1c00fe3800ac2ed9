use devframe_codec::{FrameError, OpCode};

/// Errors that can occur while building commands or parsing responses.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No service registered under the given name.
    #[error("unknown service {service:?}")]
    UnknownService { service: String },

    /// No command registered under the given service/command name.
    #[error("unknown command {service:?}/{command:?}")]
    UnknownCommand { service: String, command: String },

    /// Two services collide on a name.
    #[error("duplicate service registration {service:?}")]
    DuplicateService { service: String },

    /// Two commands in one service collide on name or identity+direction.
    #[error("duplicate command registration {service:?}/{command:?}")]
    DuplicateCommand { service: String, command: String },

    /// The frame handed to `parse` does not carry a response operation.
    #[error("unexpected operation {operation} in response frame")]
    UnexpectedOperation { operation: OpCode },

    /// A builder argument is missing, mistyped, or out of range.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A response body does not decode as the command's response shape.
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// Frame encoding failed while building a command.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
