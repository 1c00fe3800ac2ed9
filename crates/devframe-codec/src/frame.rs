use std::fmt;
use std::ops::Range;

use crate::error::{FrameError, Result};
use crate::header::{self, OpCode};

/// Total wire size of every frame.
pub const FRAME_LEN: usize = 128;

/// Offset of the origin byte (reserved, zero on requests).
pub const ORIGIN_OFFSET: usize = 0;

/// Offset of the destination byte (service selector on the device).
pub const DEST_OFFSET: usize = 1;

/// Offset of the header byte (operation + command identity).
pub const HEADER_OFFSET: usize = 2;

/// Offset of the transaction id byte (reserved, zero).
pub const TRANSACTION_OFFSET: usize = 3;

/// Offset of the first body byte.
pub const BODY_OFFSET: usize = 4;

/// Size of the body region.
pub const BODY_LEN: usize = FRAME_LEN - BODY_OFFSET;

/// A fixed-size command frame.
///
/// Wire layout (multi-byte body fields are big-endian):
///
/// ```text
/// ┌────────────┬─────────────┬──────────────┬──────────────┬─────────────┐
/// │ Origin     │ Destination │ Header       │ Transaction  │ Body        │
/// │ (1B, zero) │ (1B)        │ (1B, op|id)  │ (1B, zero)   │ (124B)      │
/// └────────────┴─────────────┴──────────────┴──────────────┴─────────────┘
/// ```
///
/// There is no length prefix and no magic: framing is by fixed size alone.
/// The origin and transaction id bytes are reserved; this codec never sets
/// them, and round-trips preserve whatever a device put there.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; FRAME_LEN],
}

impl Frame {
    /// An all-zero frame: SET operation, identity 0, destination 0.
    pub fn new() -> Self {
        Self {
            bytes: [0; FRAME_LEN],
        }
    }

    /// Wrap an exact wire image.
    pub fn from_array(bytes: [u8; FRAME_LEN]) -> Self {
        Self { bytes }
    }

    /// Decode a byte slice, which must be exactly [`FRAME_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != FRAME_LEN {
            return Err(FrameError::SizeMismatch {
                expected: FRAME_LEN,
                actual: bytes.len(),
            });
        }
        let mut image = [0u8; FRAME_LEN];
        image.copy_from_slice(bytes);
        Ok(Self { bytes: image })
    }

    /// Decode a hex image as produced by [`Frame::to_hex`].
    ///
    /// ASCII whitespace is ignored, so spaced dumps paste back cleanly.
    pub fn from_hex(image: &str) -> Result<Self> {
        let compact: String = image.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let decoded = hex::decode(compact)?;
        Self::from_bytes(&decoded)
    }

    /// The frame's wire image.
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        self.bytes
    }

    /// Borrow the frame's wire image.
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }

    /// Lowercase hex rendering of the wire image.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Route the frame to a service on the device.
    pub fn set_destination(&mut self, destination: u8) {
        self.bytes[DEST_OFFSET] = destination;
    }

    pub fn destination(&self) -> u8 {
        self.bytes[DEST_OFFSET]
    }

    /// Set the operation and command identity.
    ///
    /// Fails with [`FrameError::InvalidHeader`] when `identity` does not
    /// fit the 6-bit field.
    pub fn set_header(&mut self, op: OpCode, identity: u8) -> Result<()> {
        self.bytes[HEADER_OFFSET] = header::pack(op, identity)?;
        Ok(())
    }

    pub fn operation(&self) -> OpCode {
        header::unpack(self.bytes[HEADER_OFFSET]).0
    }

    pub fn identity(&self) -> u8 {
        header::unpack(self.bytes[HEADER_OFFSET]).1
    }

    /// Borrow the 124-byte body region.
    pub fn body(&self) -> &[u8] {
        &self.bytes[BODY_OFFSET..]
    }

    /// Write one byte into the body at `offset`.
    pub fn write_body_u8(&mut self, offset: usize, value: u8) -> Result<()> {
        self.write_at(offset, &[value])
    }

    /// Write a big-endian word into the body at `offset`.
    pub fn write_body_u16(&mut self, offset: usize, value: u16) -> Result<()> {
        self.write_at(offset, &value.to_be_bytes())
    }

    /// Write a big-endian dword into the body at `offset`.
    pub fn write_body_u32(&mut self, offset: usize, value: u32) -> Result<()> {
        self.write_at(offset, &value.to_be_bytes())
    }

    /// Write a big-endian signed dword into the body at `offset`.
    pub fn write_body_i32(&mut self, offset: usize, value: i32) -> Result<()> {
        self.write_at(offset, &value.to_be_bytes())
    }

    /// Write a raw byte run into the body at `offset`.
    pub fn write_body(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        self.write_at(offset, data)
    }

    /// Read one body byte at `offset`.
    pub fn body_u8(&self, offset: usize) -> Result<u8> {
        Ok(self.read_at::<1>(offset)?[0])
    }

    /// Read a big-endian word from the body at `offset`.
    pub fn body_u16(&self, offset: usize) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_at(offset)?))
    }

    /// Read a big-endian dword from the body at `offset`.
    pub fn body_u32(&self, offset: usize) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_at(offset)?))
    }

    /// Read a big-endian signed dword from the body at `offset`.
    pub fn body_i32(&self, offset: usize) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_at(offset)?))
    }

    /// Copy another frame's wire image into the body at `offset`.
    ///
    /// At most `BODY_LEN - offset` bytes are copied: an inner frame that
    /// does not fit is truncated, and an offset at or past the body end
    /// copies nothing. Embedding never fails.
    pub fn embed_frame(&mut self, offset: usize, inner: &Frame) {
        let take = BODY_LEN.saturating_sub(offset);
        if take == 0 {
            return;
        }
        let start = BODY_OFFSET + offset;
        self.bytes[start..start + take].copy_from_slice(&inner.bytes[..take]);
    }

    fn write_at(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let range = body_range(offset, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    fn read_at<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let range = body_range(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[range]);
        Ok(out)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({})", self.to_hex())
    }
}

/// Bounds-check a body access: `BODY_OFFSET + offset + len` must stay
/// within the frame.
fn body_range(offset: usize, len: usize) -> Result<Range<usize>> {
    let start = BODY_OFFSET.checked_add(offset);
    let end = start.and_then(|s| s.checked_add(len));
    match (start, end) {
        (Some(start), Some(end)) if end <= FRAME_LEN => Ok(start..end),
        _ => Err(FrameError::BodyOverflow {
            offset,
            len,
            capacity: BODY_LEN,
        }),
    }
}
