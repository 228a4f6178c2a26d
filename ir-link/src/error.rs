//! Errors raised by transports. The link state machine itself never fails.

/// Transport error types
#[derive(Debug)]
pub enum LinkError {
    /// I/O error on a socket
    Io(std::io::Error),
    /// Serial port could not be opened or queried
    Serial(serialport::Error),
    /// Peer closed the connection
    ConnectionClosed,
}

impl std::fmt::Display for LinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkError::Io(e) => write!(f, "I/O error: {}", e),
            LinkError::Serial(e) => write!(f, "Serial port error: {}", e),
            LinkError::ConnectionClosed => write!(f, "Connection closed"),
        }
    }
}

impl std::error::Error for LinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LinkError::Io(e) => Some(e),
            LinkError::Serial(e) => Some(e),
            LinkError::ConnectionClosed => None,
        }
    }
}

impl From<std::io::Error> for LinkError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            LinkError::ConnectionClosed
        } else {
            LinkError::Io(e)
        }
    }
}

impl From<serialport::Error> for LinkError {
    fn from(e: serialport::Error) -> Self {
        LinkError::Serial(e)
    }
}
