/// Errors that can occur while building or decoding command frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A byte image has the wrong length for a fixed-size frame.
    #[error("frame size mismatch (expected {expected} bytes, got {actual})")]
    SizeMismatch { expected: usize, actual: usize },

    /// The command identity does not fit the 6-bit header field.
    #[error("command identity {identity:#04x} exceeds the 6-bit limit 0x3f")]
    InvalidHeader { identity: u8 },

    /// A body access would run past the end of the frame.
    #[error("body access out of bounds (offset {offset} + {len} bytes, body holds {capacity})")]
    BodyOverflow {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    /// A hex image could not be decoded.
    #[error("invalid hex image: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

pub type Result<T> = std::result::Result<T, FrameError>;
