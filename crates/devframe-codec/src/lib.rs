//! Fixed-size command frame codec.
//!
//! Every exchange with a device is one 128-byte frame in each direction:
//! - 1 origin byte (reserved, zero)
//! - 1 destination byte selecting a service on the device
//! - 1 header byte: operation in the top two bits, command identity in the low six
//! - 1 transaction id byte (reserved, zero)
//! - 124 body bytes, multi-byte fields big-endian
//!
//! There is no length prefix and no magic: framing is by fixed size alone.

pub mod error;
pub mod frame;
pub mod header;

pub use error::{FrameError, Result};
pub use frame::{
    Frame, BODY_LEN, BODY_OFFSET, DEST_OFFSET, FRAME_LEN, HEADER_OFFSET, ORIGIN_OFFSET,
    TRANSACTION_OFFSET,
};
pub use header::{OpCode, ID_MASK, MAX_IDENTITY, OP_MASK};
