use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use devframe_codec::{Frame, FRAME_LEN};
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Default timeout applied to connect, read, and write.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeouts for one client connection.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum time to wait for the TCP connect to complete.
    pub connect_timeout: Duration,
    /// Read timeout for response bytes. `None` blocks indefinitely.
    pub read_timeout: Option<Duration>,
    /// Write timeout for request bytes. `None` blocks indefinitely.
    pub write_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_TIMEOUT,
            read_timeout: Some(DEFAULT_TIMEOUT),
            write_timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

/// Connection lifecycle of a [`TransactionClient`].
///
/// `Sending` and `AwaitingResponse` are the transaction phases; they only
/// exist inside a `transact` call, which ends back in `Connected` on
/// success and `Disconnected` on any failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Disconnected,
    Connecting,
    Connected,
    Sending,
    AwaitingResponse,
}

impl ClientState {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientState::Disconnected => "disconnected",
            ClientState::Connecting => "connecting",
            ClientState::Connected => "connected",
            ClientState::Sending => "sending",
            ClientState::AwaitingResponse => "awaiting-response",
        }
    }
}

/// A synchronous client owning exactly one connection to one device.
///
/// Every exchange is one 128-byte request followed by one 128-byte
/// response; the wire carries no request pairing, so at most one
/// transaction may be outstanding per connection. `transact` takes
/// `&mut self`, which makes that a compile-time guarantee; callers that
/// share a client across threads serialize it behind a mutex, and callers
/// that want parallelism open independent clients.
///
/// Any I/O failure drops the connection and parks the client in
/// [`ClientState::Disconnected`]. There is no automatic retry: after a
/// failure the device's state is unknown, and re-driving the request is a
/// policy decision left to the caller along with the explicit
/// [`TransactionClient::connect`].
pub struct TransactionClient {
    addr: String,
    config: ClientConfig,
    stream: Option<TcpStream>,
    state: ClientState,
}

impl TransactionClient {
    /// A disconnected client for `addr` (`host:port`) with default timeouts.
    pub fn new(addr: impl Into<String>) -> Self {
        Self::with_config(addr, ClientConfig::default())
    }

    /// A disconnected client with explicit timeouts.
    pub fn with_config(addr: impl Into<String>, config: ClientConfig) -> Self {
        Self {
            addr: addr.into(),
            config,
            stream: None,
            state: ClientState::Disconnected,
        }
    }

    /// The address this client talks to.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Open the connection, resolving the address and trying each
    /// candidate with the configured connect timeout.
    ///
    /// An existing connection is dropped first, so `connect` doubles as
    /// reconnect after a failure.
    pub fn connect(&mut self) -> Result<()> {
        self.stream = None;
        self.state = ClientState::Connecting;
        match self.open_stream() {
            Ok(stream) => {
                debug!(addr = %self.addr, "connected");
                self.stream = Some(stream);
                self.state = ClientState::Connected;
                Ok(())
            }
            Err(err) => {
                self.state = ClientState::Disconnected;
                Err(err)
            }
        }
    }

    /// Drop the connection. Idempotent; safe to call in any state.
    pub fn disconnect(&mut self) {
        if self.stream.take().is_some() {
            debug!(addr = %self.addr, "disconnected");
        }
        self.state = ClientState::Disconnected;
    }

    /// Non-blocking liveness probe: peeks one byte without consuming it.
    ///
    /// Returns `false` when disconnected or when the peer has closed the
    /// stream, `true` when data is pending or the probe would block. Does
    /// not change the client state; the next `transact` surfaces the
    /// failure if the peer is really gone.
    pub fn is_alive(&self) -> bool {
        match &self.stream {
            Some(stream) => !peer_closed(stream),
            None => false,
        }
    }

    /// Send one request frame and read exactly one response frame.
    ///
    /// Fails with [`ClientError::NotConnected`] when there is no
    /// connection, [`ClientError::ShortRead`] when the peer closes before
    /// 128 response bytes arrive, and [`ClientError::Timeout`] when the
    /// configured read or write timeout elapses. Every failure drops the
    /// connection.
    pub fn transact(&mut self, request: &Frame) -> Result<Frame> {
        let mut stream = self.stream.take().ok_or(ClientError::NotConnected)?;
        self.state = ClientState::Sending;
        match self.exchange(&mut stream, request) {
            Ok(response) => {
                self.stream = Some(stream);
                self.state = ClientState::Connected;
                Ok(response)
            }
            Err(err) => {
                // stream drops here; the device sees the close
                self.state = ClientState::Disconnected;
                warn!(addr = %self.addr, error = %err, "transaction failed, connection dropped");
                Err(err)
            }
        }
    }

    fn exchange(&mut self, stream: &mut TcpStream, request: &Frame) -> Result<Frame> {
        stream
            .write_all(request.as_bytes())
            .map_err(|err| classify_io(err, self.config.write_timeout))?;
        self.state = ClientState::AwaitingResponse;
        receive_frame(stream, self.config.read_timeout)
    }

    fn open_stream(&self) -> Result<TcpStream> {
        let connect_err = |source: std::io::Error| ClientError::Connect {
            addr: self.addr.clone(),
            source,
        };
        let candidates: Vec<SocketAddr> = self
            .addr
            .to_socket_addrs()
            .map_err(connect_err)?
            .collect();

        let mut last = std::io::Error::new(
            ErrorKind::AddrNotAvailable,
            "address resolved to no candidates",
        );
        for candidate in candidates {
            match TcpStream::connect_timeout(&candidate, self.config.connect_timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(self.config.read_timeout)?;
                    stream.set_write_timeout(self.config.write_timeout)?;
                    return Ok(stream);
                }
                Err(source) => last = source,
            }
        }
        Err(connect_err(last))
    }
}

/// Read exactly one frame, looping over partial reads.
fn receive_frame(stream: &mut TcpStream, timeout: Option<Duration>) -> Result<Frame> {
    let mut image = [0u8; FRAME_LEN];
    let mut filled = 0;
    while filled < FRAME_LEN {
        match stream.read(&mut image[filled..]) {
            Ok(0) => {
                return Err(ClientError::ShortRead {
                    received: filled,
                    expected: FRAME_LEN,
                })
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(classify_io(err, timeout)),
        }
    }
    Ok(Frame::from_array(image))
}

/// A timed-out socket read/write surfaces as `WouldBlock` or `TimedOut`
/// depending on the platform; both mean the configured timeout elapsed.
fn classify_io(err: std::io::Error, timeout: Option<Duration>) -> ClientError {
    match err.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => {
            ClientError::Timeout(timeout.unwrap_or_default())
        }
        _ => ClientError::Io(err),
    }
}

#[cfg(unix)]
fn peer_closed(stream: &TcpStream) -> bool {
    use std::os::fd::AsRawFd;

    let mut byte = 0u8;
    // SAFETY: the buffer pointer is valid for the 1-byte length passed, and
    // the fd is an open socket descriptor owned by `stream` for the whole call.
    let rc = unsafe {
        libc::recv(
            stream.as_raw_fd(),
            (&mut byte as *mut u8).cast::<libc::c_void>(),
            1,
            libc::MSG_PEEK | libc::MSG_DONTWAIT,
        )
    };
    match rc {
        // Orderly shutdown by the peer.
        0 => true,
        // Data pending; the connection is live.
        1.. => false,
        _ => {
            let err = std::io::Error::last_os_error();
            // EWOULDBLOCK means an idle but open connection.
            !matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted)
        }
    }
}

#[cfg(not(unix))]
fn peer_closed(stream: &TcpStream) -> bool {
    if stream.set_nonblocking(true).is_err() {
        return true;
    }
    let mut byte = [0u8; 1];
    let closed = match stream.peek(&mut byte) {
        Ok(0) => true,
        Ok(_) => false,
        Err(err) => !matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted),
    };
    let _ = stream.set_nonblocking(false);
    closed
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::thread;

    use devframe_codec::{OpCode, ID_MASK};

    use super::*;

    fn spawn_device<F>(handler: F) -> (String, thread::JoinHandle<()>)
    where
        F: FnOnce(TcpStream) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let handle = thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                handler(stream);
            }
        });
        (addr, handle)
    }

    fn read_request(stream: &mut TcpStream) -> [u8; FRAME_LEN] {
        let mut buf = [0u8; FRAME_LEN];
        stream.read_exact(&mut buf).unwrap();
        buf
    }

    /// Echo the request back with the operation flipped to RES.
    fn res_echo(request: &[u8; FRAME_LEN]) -> [u8; FRAME_LEN] {
        let mut out = *request;
        out[2] = (out[2] & ID_MASK) | OpCode::Res.wire_bits();
        out
    }

    fn request_frame(identity: u8, first_body_byte: u8) -> Frame {
        let mut frame = Frame::new();
        frame.set_destination(2);
        frame.set_header(OpCode::Get, identity).unwrap();
        frame.write_body_u8(0, first_body_byte).unwrap();
        frame
    }

    fn quick_config() -> ClientConfig {
        ClientConfig {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Some(Duration::from_millis(200)),
            write_timeout: Some(Duration::from_millis(200)),
        }
    }

    #[test]
    fn test_transact_roundtrip() {
        let (addr, device) = spawn_device(|mut stream| {
            let request = read_request(&mut stream);
            stream.write_all(&res_echo(&request)).unwrap();
        });

        let mut client = TransactionClient::new(addr);
        client.connect().unwrap();
        assert_eq!(client.state(), ClientState::Connected);

        let response = client.transact(&request_frame(3, 0x55)).unwrap();
        assert_eq!(response.operation(), OpCode::Res);
        assert_eq!(response.identity(), 3);
        assert_eq!(response.body()[0], 0x55);
        assert_eq!(client.state(), ClientState::Connected);

        client.disconnect();
        device.join().unwrap();
    }

    #[test]
    fn test_response_assembled_from_partial_writes() {
        let (addr, device) = spawn_device(|mut stream| {
            let request = read_request(&mut stream);
            let response = res_echo(&request);
            for chunk in response.chunks(40) {
                stream.write_all(chunk).unwrap();
                stream.flush().unwrap();
                thread::sleep(Duration::from_millis(10));
            }
        });

        let mut client = TransactionClient::new(addr);
        client.connect().unwrap();
        let response = client.transact(&request_frame(1, 9)).unwrap();
        assert_eq!(response.identity(), 1);

        client.disconnect();
        device.join().unwrap();
    }

    #[test]
    fn test_short_read_drops_connection() {
        let (addr, device) = spawn_device(|mut stream| {
            let request = read_request(&mut stream);
            stream.write_all(&res_echo(&request)[..64]).unwrap();
            // Drop closes the stream mid-response.
        });

        let mut client = TransactionClient::new(addr);
        client.connect().unwrap();
        let err = client.transact(&request_frame(1, 0)).unwrap_err();
        assert!(matches!(
            err,
            ClientError::ShortRead {
                received: 64,
                expected: 128,
            }
        ));
        assert_eq!(client.state(), ClientState::Disconnected);
        assert!(!client.is_alive());

        // No automatic retry: the next transact refuses outright.
        assert!(matches!(
            client.transact(&request_frame(1, 0)),
            Err(ClientError::NotConnected)
        ));
        device.join().unwrap();
    }

    #[test]
    fn test_read_timeout_drops_connection() {
        let (addr, device) = spawn_device(|mut stream| {
            let _request = read_request(&mut stream);
            // Never reply; hold the stream past the client's timeout.
            thread::sleep(Duration::from_millis(600));
        });

        let mut client = TransactionClient::with_config(addr, quick_config());
        client.connect().unwrap();
        let err = client.transact(&request_frame(2, 0)).unwrap_err();
        assert!(matches!(err, ClientError::Timeout(_)));
        assert_eq!(client.state(), ClientState::Disconnected);
        device.join().unwrap();
    }

    #[test]
    fn test_connect_refused() {
        // Bind then drop to get an address nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let mut client = TransactionClient::new(addr.clone());
        let err = client.connect().unwrap_err();
        assert!(matches!(err, ClientError::Connect { addr: a, .. } if a == addr));
        assert_eq!(client.state(), ClientState::Disconnected);
    }

    #[test]
    fn test_transact_without_connect() {
        let mut client = TransactionClient::new("127.0.0.1:9");
        assert!(matches!(
            client.transact(&Frame::new()),
            Err(ClientError::NotConnected)
        ));
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let (addr, device) = spawn_device(|stream| {
            thread::sleep(Duration::from_millis(50));
            drop(stream);
        });

        let mut client = TransactionClient::new(addr);
        client.connect().unwrap();
        client.disconnect();
        client.disconnect();
        assert_eq!(client.state(), ClientState::Disconnected);
        device.join().unwrap();
    }

    #[test]
    fn test_is_alive_tracks_peer() {
        let (addr, device) = spawn_device(|stream| {
            thread::sleep(Duration::from_millis(200));
            drop(stream);
        });

        let mut client = TransactionClient::new(addr);
        assert!(!client.is_alive());
        client.connect().unwrap();
        assert!(client.is_alive());

        device.join().unwrap();
        // Give the close time to reach our end.
        thread::sleep(Duration::from_millis(50));
        assert!(!client.is_alive());
        // The probe never transitions state by itself.
        assert_eq!(client.state(), ClientState::Connected);
    }

    #[test]
    fn test_reconnect_after_failure() {
        let (addr, device) = spawn_device(|mut stream| {
            let _ = read_request(&mut stream);
            // Close without answering.
        });

        let mut client = TransactionClient::new(addr);
        client.connect().unwrap();
        assert!(client.transact(&request_frame(1, 0)).is_err());
        assert_eq!(client.state(), ClientState::Disconnected);
        device.join().unwrap();

        // Explicit reconnect against a fresh device restores service.
        let (addr, device) = spawn_device(|mut stream| {
            let request = read_request(&mut stream);
            stream.write_all(&res_echo(&request)).unwrap();
        });
        let mut client = TransactionClient::new(addr);
        client.connect().unwrap();
        assert!(client.transact(&request_frame(1, 0)).is_ok());
        client.disconnect();
        device.join().unwrap();
    }

    #[test]
    fn test_mutex_serializes_transactions() {
        let (addr, device) = spawn_device(|mut stream| {
            // Strict alternation: any interleaving of request bytes would
            // desync these exact reads.
            for _ in 0..2 {
                let request = read_request(&mut stream);
                stream.write_all(&res_echo(&request)).unwrap();
            }
        });

        let mut client = TransactionClient::new(addr);
        client.connect().unwrap();
        let client = Arc::new(Mutex::new(client));

        let workers: Vec<_> = [0x11u8, 0x22u8]
            .into_iter()
            .map(|tag| {
                let client = Arc::clone(&client);
                thread::spawn(move || {
                    let response = client
                        .lock()
                        .unwrap()
                        .transact(&request_frame(1, tag))
                        .unwrap();
                    assert_eq!(response.body()[0], tag);
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
        device.join().unwrap();
    }
}
