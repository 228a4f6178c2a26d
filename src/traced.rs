//! Transport wrapper that logs every IR byte at `-vvv`.

use crate::logger::Logger;
use ir_link::{wire, LinkError, Transport};

pub struct TracedTransport<T> {
    inner: T,
    logger: Logger,
}

impl<T: Transport> TracedTransport<T> {
    pub fn new(inner: T, logger: Logger) -> Self {
        TracedTransport { inner, logger }
    }
}

impl<T: Transport> Transport for TracedTransport<T> {
    fn byte_available(&mut self) -> bool {
        self.inner.byte_available()
    }

    fn ready_to_send(&mut self) -> bool {
        self.inner.ready_to_send()
    }

    fn receive_byte(&mut self) -> u8 {
        let byte = self.inner.receive_byte();
        self.logger
            .trace_ir(&format!("[IR] <- {:02X} {}", byte, wire::decode(byte)));
        byte
    }

    fn send_byte(&mut self, byte: u8) {
        self.logger
            .trace_ir(&format!("[IR] -> {:02X} {}", byte, wire::decode(byte)));
        self.inner.send_byte(byte);
    }

    fn take_error(&mut self) -> Option<LinkError> {
        self.inner.take_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_args::Verbosity;
    use ir_link::QueueLink;

    #[test]
    fn test_bytes_pass_through() {
        let (a, b) = QueueLink::pair();
        let mut traced = TracedTransport::new(a, Logger::stderr(Verbosity::Quiet));
        traced.send_byte(0xFE);
        assert_eq!(b.incoming(), vec![0xFE]);

        b.clone().send_byte(0xD3);
        assert!(traced.byte_available());
        assert_eq!(traced.receive_byte(), 0xD3);
        assert!(!traced.byte_available());
        assert!(traced.take_error().is_none());
    }
}
