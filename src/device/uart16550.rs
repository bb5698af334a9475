//! Interrupt-driven 16550 transmitter
//!
//! Implements [`Transport`] for a memory-mapped 16550-compatible UART: each
//! transfer writes one byte into the transmit holding register and arms the
//! THR-empty interrupt. The board's UART interrupt handler then calls
//! [`TxEngine::service_interrupt`](crate::tx::TxEngine::service_interrupt),
//! which asks [`poll_complete`](Transport::poll_complete) whether the byte
//! has gone out.

use bitflags::bitflags;

use crate::tx::{TxMode, TxRegion, Transport};

bitflags! {
    /// Interrupt enable register bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IntEnFlags: u8 {
        /// Received data available
        const RECEIVED = 1;
        /// Transmit holding register empty
        const SENT = 1 << 1;
        /// Receiver line status
        const ERRORED = 1 << 2;
        /// Modem status
        const STATUS_CHANGE = 1 << 3;
    }
}

bitflags! {
    /// Line status register bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineStsFlags: u8 {
        /// Data ready
        const INPUT_FULL = 1;
        /// Transmit holding register empty
        const OUTPUT_EMPTY = 1 << 5;
        /// Transmitter fully idle
        const TRANSMITTER_EMPTY = 1 << 6;
    }
}

const THR: usize = 0;
const IER: usize = 1;
const FCR: usize = 2;
const LCR: usize = 3;
const MCR: usize = 4;
const LSR: usize = 5;

/// 16550 transmit side used as the logger's transport.
pub struct Ns16550Tx {
    base: *mut u8,
    port: usize,
    /// Bytes written to THR and not yet confirmed
    pending: usize,
}

// Safety: the register block is owned by this value; all access goes through
// the engine's lock.
unsafe impl Send for Ns16550Tx {}

impl Ns16550Tx {
    /// Creates a transmitter for the register block at `base`.
    ///
    /// # Safety
    ///
    /// `base` must point to a mapped 16550 register block with byte stride
    /// that nothing else drives while this value exists.
    pub const unsafe fn new(base: usize, port: usize) -> Self {
        Self {
            base: base as *mut u8,
            port,
            pending: 0,
        }
    }

    /// Programs 8N1 with FIFOs enabled and all interrupts masked.
    ///
    /// Baud rate is left as the firmware configured it.
    pub fn init(&mut self) {
        self.write_reg(IER, IntEnFlags::empty().bits());
        self.write_reg(LCR, 0x03);
        self.write_reg(FCR, 0xC7);
        self.write_reg(MCR, 0x0B);
    }

    fn line_sts(&self) -> LineStsFlags {
        LineStsFlags::from_bits_truncate(self.read_reg(LSR))
    }

    fn int_en(&self) -> IntEnFlags {
        IntEnFlags::from_bits_truncate(self.read_reg(IER))
    }

    fn set_int_en(&mut self, flags: IntEnFlags) {
        self.write_reg(IER, flags.bits());
    }

    fn read_reg(&self, offset: usize) -> u8 {
        unsafe { self.base.add(offset).read_volatile() }
    }

    fn write_reg(&mut self, offset: usize, value: u8) {
        unsafe { self.base.add(offset).write_volatile(value) }
    }
}

impl Transport for Ns16550Tx {
    fn port(&self) -> usize {
        self.port
    }

    fn mode(&self) -> TxMode {
        TxMode::Interrupt
    }

    fn start_transfer(&mut self, region: TxRegion) {
        // Interrupt mode only ever hands out one byte
        let Some(&byte) = (unsafe { region.as_slice() }).first() else {
            return;
        };
        self.write_reg(THR, byte);
        self.pending = 1;
        let flags = self.int_en() | IntEnFlags::SENT;
        self.set_int_en(flags);
    }

    fn poll_complete(&mut self) -> Option<usize> {
        if self.pending == 0 || !self.line_sts().contains(LineStsFlags::OUTPUT_EMPTY) {
            return None;
        }
        let flags = self.int_en() - IntEnFlags::SENT;
        self.set_int_en(flags);
        Some(core::mem::take(&mut self.pending))
    }
}
