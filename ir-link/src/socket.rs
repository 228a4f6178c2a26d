//! Socket transport for Unix sockets and TCP connections.
//!
//! Stands in for the IR channel when both devices are simulated on a host:
//! every IR byte travels as one raw byte on the stream, with no framing.

use std::collections::VecDeque;
use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};
#[cfg(unix)]
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;

use crate::transport::Transport;
use crate::wire::BLANK;
use crate::LinkError;

/// Default socket path for Unix sockets
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/ir-pong.sock";

/// Socket address type - either Unix socket path or TCP address
#[derive(Debug, Clone)]
pub enum SocketAddr {
    #[cfg(unix)]
    Unix(String),
    Tcp(String),
}

impl SocketAddr {
    /// Create a Unix socket address
    #[cfg(unix)]
    pub fn unix<P: AsRef<Path>>(path: P) -> Self {
        SocketAddr::Unix(path.as_ref().to_string_lossy().to_string())
    }

    /// Create a TCP socket address
    pub fn tcp<S: Into<String>>(addr: S) -> Self {
        SocketAddr::Tcp(addr.into())
    }
}

impl std::fmt::Display for SocketAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(unix)]
            SocketAddr::Unix(path) => write!(f, "{}", path),
            SocketAddr::Tcp(addr) => write!(f, "{}", addr),
        }
    }
}

enum ListenerInner {
    #[cfg(unix)]
    Unix(UnixListener),
    Tcp(TcpListener),
}

/// A socket listener that accepts the peer device
pub struct SocketListener {
    inner: ListenerInner,
    addr: SocketAddr,
}

impl SocketListener {
    /// Bind to a socket address and start listening
    pub fn bind(addr: &SocketAddr) -> Result<Self, LinkError> {
        let inner = match addr {
            #[cfg(unix)]
            SocketAddr::Unix(path) => {
                // Remove a stale socket file left by an earlier run
                let _ = std::fs::remove_file(path);
                ListenerInner::Unix(UnixListener::bind(path)?)
            }
            SocketAddr::Tcp(addr_str) => ListenerInner::Tcp(TcpListener::bind(addr_str)?),
        };
        Ok(SocketListener {
            inner,
            addr: addr.clone(),
        })
    }

    /// Accept the peer (blocking)
    pub fn accept(&self) -> Result<SocketTransport, LinkError> {
        match &self.inner {
            #[cfg(unix)]
            ListenerInner::Unix(listener) => {
                let (stream, _) = listener.accept()?;
                SocketTransport::new(StreamInner::Unix(stream))
            }
            ListenerInner::Tcp(listener) => {
                let (stream, _) = listener.accept()?;
                SocketTransport::from_tcp(stream)
            }
        }
    }

    /// Get the address this listener is bound to
    pub fn addr(&self) -> &SocketAddr {
        &self.addr
    }
}

#[cfg(unix)]
impl Drop for SocketListener {
    fn drop(&mut self) {
        if let SocketAddr::Unix(path) = &self.addr {
            let _ = std::fs::remove_file(path);
        }
    }
}

enum StreamInner {
    #[cfg(unix)]
    Unix(UnixStream),
    Tcp(TcpStream),
}

impl StreamInner {
    fn set_nonblocking(&self, nonblocking: bool) -> std::io::Result<()> {
        match self {
            #[cfg(unix)]
            StreamInner::Unix(s) => s.set_nonblocking(nonblocking),
            StreamInner::Tcp(s) => s.set_nonblocking(nonblocking),
        }
    }

    fn shutdown(&self) -> std::io::Result<()> {
        match self {
            #[cfg(unix)]
            StreamInner::Unix(s) => s.shutdown(std::net::Shutdown::Both),
            StreamInner::Tcp(s) => s.shutdown(std::net::Shutdown::Both),
        }
    }
}

impl Read for StreamInner {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            #[cfg(unix)]
            StreamInner::Unix(s) => s.read(buf),
            StreamInner::Tcp(s) => s.read(buf),
        }
    }
}

impl Write for StreamInner {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            #[cfg(unix)]
            StreamInner::Unix(s) => s.write(buf),
            StreamInner::Tcp(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            #[cfg(unix)]
            StreamInner::Unix(s) => s.flush(),
            StreamInner::Tcp(s) => s.flush(),
        }
    }
}

/// Non-blocking byte transport over a connected socket.
///
/// The first I/O failure is kept for [`Transport::take_error`]; after that the
/// transport reports neither received bytes nor send readiness.
pub struct SocketTransport {
    stream: StreamInner,
    rx: VecDeque<u8>,
    error: Option<LinkError>,
    failed: bool,
}

impl SocketTransport {
    fn new(stream: StreamInner) -> Result<Self, LinkError> {
        stream.set_nonblocking(true)?;
        Ok(SocketTransport {
            stream,
            rx: VecDeque::new(),
            error: None,
            failed: false,
        })
    }

    fn from_tcp(stream: TcpStream) -> Result<Self, LinkError> {
        // One byte per write; don't let Nagle hold it back
        let _ = stream.set_nodelay(true);
        SocketTransport::new(StreamInner::Tcp(stream))
    }

    /// Connect to the peer device
    pub fn connect(addr: &SocketAddr) -> Result<Self, LinkError> {
        match addr {
            #[cfg(unix)]
            SocketAddr::Unix(path) => SocketTransport::new(StreamInner::Unix(UnixStream::connect(path)?)),
            SocketAddr::Tcp(addr_str) => SocketTransport::from_tcp(TcpStream::connect(addr_str)?),
        }
    }

    /// Shutdown the connection
    pub fn shutdown(&self) -> Result<(), LinkError> {
        self.stream.shutdown()?;
        Ok(())
    }

    fn fail(&mut self, error: LinkError) {
        if !self.failed {
            self.failed = true;
            self.error = Some(error);
        }
    }

    fn fill(&mut self) {
        let mut buf = [0u8; 64];
        match self.stream.read(&mut buf) {
            Ok(0) => self.fail(LinkError::ConnectionClosed),
            Ok(n) => self.rx.extend(&buf[..n]),
            Err(ref e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::Interrupted => {}
            Err(e) => self.fail(e.into()),
        }
    }
}

impl Transport for SocketTransport {
    fn byte_available(&mut self) -> bool {
        if self.rx.is_empty() && !self.failed {
            self.fill();
        }
        !self.rx.is_empty()
    }

    fn ready_to_send(&mut self) -> bool {
        !self.failed
    }

    fn receive_byte(&mut self) -> u8 {
        self.rx.pop_front().unwrap_or(BLANK)
    }

    fn send_byte(&mut self, byte: u8) {
        if self.failed {
            return;
        }
        match self.stream.write(&[byte]) {
            Ok(_) => {}
            // A full socket buffer loses the byte, as a busy IR receiver would
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => {}
            Err(e) => self.fail(e.into()),
        }
    }

    fn take_error(&mut self) -> Option<LinkError> {
        self.error.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::{Event, Link};
    use std::thread;
    use std::time::Duration;

    #[cfg(unix)]
    fn connected_pair(socket_path: &str) -> (SocketTransport, SocketTransport) {
        let addr = SocketAddr::unix(socket_path);
        let listener = SocketListener::bind(&addr).unwrap();
        let server_thread = thread::spawn(move || listener.accept().unwrap());
        let client = SocketTransport::connect(&addr).unwrap();
        let server = server_thread.join().unwrap();
        (server, client)
    }

    #[test]
    #[cfg(unix)]
    fn test_unix_socket_bytes() {
        let (mut server, mut client) = connected_pair("/tmp/ir-link-test-bytes.sock");
        assert!(!server.byte_available());

        client.send_byte(0xFE);
        client.send_byte(0x03);
        thread::sleep(Duration::from_millis(20));
        assert!(server.byte_available());
        assert_eq!(server.receive_byte(), 0xFE);
        assert_eq!(server.receive_byte(), 0x03);
        assert!(!server.byte_available());
        assert_eq!(server.receive_byte(), BLANK);

        drop(client);
        thread::sleep(Duration::from_millis(20));
        assert!(!server.byte_available());
        assert!(!server.ready_to_send());
        assert!(matches!(server.take_error(), Some(LinkError::ConnectionClosed)));
        assert!(server.take_error().is_none());
    }

    #[test]
    #[cfg(unix)]
    fn test_handshake_over_unix_socket() {
        let (mut ta, mut tb) = connected_pair("/tmp/ir-link-test-handshake.sock");
        let mut a = Link::new();
        let mut b = Link::new();
        a.request_start();

        let mut a_started = None;
        let mut b_started = None;
        for _ in 0..200 {
            if let Event::GameStarted { has_ball } = a.update(&mut ta) {
                a_started = Some(has_ball);
            }
            if let Event::GameStarted { has_ball } = b.update(&mut tb) {
                b_started = Some(has_ball);
            }
            if a_started.is_some() && b_started.is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(a_started, Some(true));
        assert_eq!(b_started, Some(false));
    }
}
