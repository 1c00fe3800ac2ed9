//! Synchronous transaction client for frame-per-exchange devices.
//!
//! One client owns one TCP connection. A transaction is one 128-byte
//! request followed by exactly one 128-byte response; nothing on the wire
//! pairs them, so a connection carries at most one transaction at a time
//! and concurrency is the caller's concern (mutex a shared client, or open
//! one client per worker).
//!
//! Failure policy: any I/O error drops the connection. Reconnecting is
//! always explicit; the client never retries on its own.

pub mod client;
pub mod error;

pub use client::{ClientConfig, ClientState, TransactionClient, DEFAULT_TIMEOUT};
pub use error::{ClientError, Result};
