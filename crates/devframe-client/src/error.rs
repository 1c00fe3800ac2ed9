/// Errors that can occur in client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connecting to the device failed.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    /// The operation needs a live connection and there is none.
    #[error("not connected")]
    NotConnected,

    /// The peer closed the stream before a full frame arrived.
    #[error("short read: connection closed after {received} of {expected} bytes")]
    ShortRead { received: usize, expected: usize },

    /// The exchange did not complete within the configured timeout.
    #[error("transaction timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Any other stream-level I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
