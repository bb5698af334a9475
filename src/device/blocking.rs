//! Synchronous UART sink
//!
//! For boards where neither the transmit interrupt nor a DMA channel is
//! available to the logger: every message is pushed out byte by byte before
//! `write` returns. Unsuitable for interrupt context, but it needs no
//! completion wiring at all.

use spin::Mutex;
use uart_16550::MmioSerialPort;

use crate::log::LogSink;

/// Byte-at-a-time blocking serial output.
pub trait SerialWrite {
    /// Waits until the transmitter accepts `byte`.
    fn write_byte(&mut self, byte: u8);
}

impl SerialWrite for MmioSerialPort {
    fn write_byte(&mut self, byte: u8) {
        self.send(byte);
    }
}

/// [`LogSink`] that writes straight to a serial port.
///
/// A message that arrives while another is being written (an interrupt
/// preempting the writer) is dropped, since waiting would deadlock.
pub struct BlockingSerialSink<W> {
    port: Mutex<W>,
}

impl<W: SerialWrite> BlockingSerialSink<W> {
    /// Wraps an initialized port.
    pub const fn new(port: W) -> Self {
        Self {
            port: Mutex::new(port),
        }
    }

    /// Runs `f` with exclusive access to the port.
    pub fn with_port<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.port.lock())
    }
}

impl<W: SerialWrite> LogSink for BlockingSerialSink<W> {
    fn write(&self, bytes: &[u8]) {
        let Some(mut port) = self.port.try_lock() else {
            return;
        };
        for &byte in bytes {
            port.write_byte(byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Wire(std::vec::Vec<u8>);

    impl SerialWrite for Wire {
        fn write_byte(&mut self, byte: u8) {
            self.0.push(byte);
        }
    }

    test_case!(test_message_written_in_full, {
        let sink = BlockingSerialSink::new(Wire::default());
        sink.write(b"abc");
        sink.write(b"def");
        kassert!(sink.with_port(|w| w.0 == b"abcdef"));
    });

    test_case!(test_contended_write_is_dropped, {
        let sink = BlockingSerialSink::new(Wire::default());
        let held = sink.port.lock();
        sink.write(b"lost");
        drop(held);
        kassert!(sink.with_port(|w| w.0.is_empty()));
    });
}
