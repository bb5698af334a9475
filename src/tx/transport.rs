//! Hardware transport boundary
//!
//! The engine never touches registers itself. It hands a [`TxRegion`] to a
//! [`Transport`] and waits to be told, from interrupt context, how many bytes
//! went out.

use core::ptr::NonNull;

use crate::config::DEFAULT_LOG_PORT;

/// How much data a single hardware transfer carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    /// One byte per transfer; completion fires once the byte has left the
    /// transmit holding register.
    Interrupt,
    /// The whole contiguous run up to the physical end of the ring.
    Dma,
}

/// A contiguous slice of the ring buffer that is currently being sent.
///
/// The bytes stay valid and unmodified until the engine receives the
/// completion for this transfer: the producer only writes behind `head`, and
/// `tail` does not move past the region before the notification arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxRegion {
    ptr: NonNull<u8>,
    len: usize,
}

impl TxRegion {
    pub(crate) fn new(ptr: NonNull<u8>, len: usize) -> Self {
        Self { ptr, len }
    }

    /// Start address, for programming a DMA channel.
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Number of bytes in the transfer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false for regions handed out by the engine.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrows the queued bytes.
    ///
    /// # Safety
    ///
    /// The caller must not hold the slice past the completion notification of
    /// this transfer, and the engine that produced the region must still be
    /// alive.
    pub unsafe fn as_slice<'a>(&self) -> &'a [u8] {
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

/// Asynchronous hardware transmitter driven by the engine.
///
/// All methods are called with the engine's state lock held, i.e. with
/// interrupts masked. They must do a bounded amount of register work and
/// return.
pub trait Transport {
    /// Identifies the hardware instance, used to route completion events.
    fn port(&self) -> usize {
        DEFAULT_LOG_PORT
    }

    /// Transfer granularity of this transmitter.
    fn mode(&self) -> TxMode {
        TxMode::Interrupt
    }

    /// Begins a non-blocking transfer of `region`.
    ///
    /// Completion must be reported exactly once, either through
    /// [`TxEngine::on_transfer_complete`] or through
    /// [`TxEngine::service_interrupt`] and [`Transport::poll_complete`].
    ///
    /// [`TxEngine::on_transfer_complete`]: super::TxEngine::on_transfer_complete
    /// [`TxEngine::service_interrupt`]: super::TxEngine::service_interrupt
    fn start_transfer(&mut self, region: TxRegion);

    /// Checks the hardware for a finished transfer and returns the number of
    /// bytes sent. Transports that are notified by a HAL callback keep the
    /// default.
    fn poll_complete(&mut self) -> Option<usize> {
        None
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn port(&self) -> usize {
        (**self).port()
    }

    fn mode(&self) -> TxMode {
        (**self).mode()
    }

    fn start_transfer(&mut self, region: TxRegion) {
        (**self).start_transfer(region)
    }

    fn poll_complete(&mut self) -> Option<usize> {
        (**self).poll_complete()
    }
}

/// A transfer-complete event as delivered by the interrupt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxCompletion {
    /// Hardware instance that raised the event.
    pub port: usize,
    /// Bytes actually transferred.
    pub transferred: usize,
}

impl TxCompletion {
    /// Creates an event for `port`.
    pub const fn new(port: usize, transferred: usize) -> Self {
        Self { port, transferred }
    }
}

/// Something that wants to see transfer-complete events.
///
/// The logger implements this; applications implement it for their own
/// UART users and chain both with [`dispatch_tx_complete`].
pub trait TxCompleteHandler {
    /// Handles `event`. Returns true if the event belonged to this handler.
    fn tx_complete(&self, event: &TxCompletion) -> bool;
}

impl<H: TxCompleteHandler + ?Sized> TxCompleteHandler for &H {
    fn tx_complete(&self, event: &TxCompletion) -> bool {
        (**self).tx_complete(event)
    }
}

/// Offers `event` to every handler in `chain`, in order.
///
/// Every handler sees the event even after one has claimed it, the same way
/// a board-level callback forwards to each driver sharing the interrupt.
/// Returns true if any handler claimed it.
pub fn dispatch_tx_complete(chain: &[&dyn TxCompleteHandler], event: &TxCompletion) -> bool {
    let mut claimed = false;
    for handler in chain {
        claimed |= handler.tx_complete(event);
    }
    claimed
}
