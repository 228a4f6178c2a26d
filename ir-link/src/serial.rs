//! Serial port transport, for an IR UART attached to the host.

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::SerialPort;

use crate::transport::Transport;
use crate::wire::BLANK;
use crate::LinkError;

/// Baud rate of the IR UART on the original hardware
pub const DEFAULT_BAUD_RATE: u32 = 2400;

/// Names of the serial ports present on this machine
pub fn available_ports() -> Result<Vec<String>, LinkError> {
    Ok(serialport::available_ports()?
        .into_iter()
        .map(|p| p.port_name)
        .collect())
}

/// Transport polling a serial device. Like [`crate::SocketTransport`], it
/// keeps the first failure and goes quiet afterwards.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    error: Option<LinkError>,
    failed: bool,
}

impl SerialTransport {
    /// Open `path` at `baud_rate`, 8N1
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, LinkError> {
        let port = serialport::new(path, baud_rate)
            .timeout(Duration::from_millis(1))
            .open()?;
        Ok(SerialTransport {
            port,
            error: None,
            failed: false,
        })
    }

    pub fn name(&self) -> Option<String> {
        self.port.name()
    }

    fn fail(&mut self, error: LinkError) {
        if !self.failed {
            self.failed = true;
            self.error = Some(error);
        }
    }
}

impl Transport for SerialTransport {
    fn byte_available(&mut self) -> bool {
        if self.failed {
            return false;
        }
        match self.port.bytes_to_read() {
            Ok(n) => n > 0,
            Err(e) => {
                self.fail(e.into());
                false
            }
        }
    }

    fn ready_to_send(&mut self) -> bool {
        if self.failed {
            return false;
        }
        // Ready once the previous byte has left the transmitter
        match self.port.bytes_to_write() {
            Ok(n) => n == 0,
            Err(e) => {
                self.fail(e.into());
                false
            }
        }
    }

    fn receive_byte(&mut self) -> u8 {
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(1) => buf[0],
            Ok(_) => BLANK,
            Err(ref e) if e.kind() == ErrorKind::TimedOut => BLANK,
            Err(e) => {
                self.fail(e.into());
                BLANK
            }
        }
    }

    fn send_byte(&mut self, byte: u8) {
        if self.failed {
            return;
        }
        if let Err(e) = self.port.write_all(&[byte]) {
            self.fail(e.into());
        }
    }

    fn take_error(&mut self) -> Option<LinkError> {
        self.error.take()
    }
}
