//! Transmit state machine
//!
//! ```text
//!            kick() [queue non-empty]
//!   Idle  ────────────────────────────▶  Sending
//!    ▲                                      │
//!    └──────────────────────────────────────┘
//!        on_transfer_complete(n) then kick()
//! ```
//!
//! Exactly one transfer is in flight at a time. The completion handler
//! finishes the old transfer and starts the next one inside the same
//! critical section, so a producer that enqueues concurrently either sees
//! `Sending` (and leaves the new bytes for the next completion) or sees
//! `Idle` with the cursors already advanced.

use core::sync::atomic::{AtomicUsize, Ordering};

use super::ring_buffer::{Cursors, TxRingBuffer};
use super::transport::{TxCompleteHandler, TxCompletion, TxMode, Transport};
use crate::config::LOG_RING_BUFFER_SIZE;
use crate::log::LogSink;
use crate::sync::{RawSpinLock, SpinLock, SpinLockGuard};

/// Engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    /// No transfer in flight.
    Idle,
    /// A transfer of `in_flight` bytes has been started and not yet completed.
    Sending,
}

struct EngineState<T> {
    status: TxStatus,
    in_flight: usize,
    transport: T,
}

/// Ring-buffer-backed asynchronous transmitter.
///
/// Producers call [`send`](Self::send) (or use the engine as a [`LogSink`]);
/// the interrupt layer calls [`on_transfer_complete`](Self::on_transfer_complete)
/// or [`service_interrupt`](Self::service_interrupt).
pub struct TxEngine<T, const N: usize = LOG_RING_BUFFER_SIZE> {
    ring: TxRingBuffer<N>,
    /// Lock order: `state` before the ring's cursor lock
    state: SpinLock<EngineState<T>>,
    transfers: AtomicUsize,
    spurious: AtomicUsize,
}

impl<T: Transport, const N: usize> TxEngine<T, N> {
    /// Creates an idle engine around `transport`.
    pub const fn new(transport: T) -> Self {
        Self {
            ring: TxRingBuffer::new(),
            state: SpinLock::const_new(
                RawSpinLock::new(),
                EngineState {
                    status: TxStatus::Idle,
                    in_flight: 0,
                    transport,
                },
            ),
            transfers: AtomicUsize::new(0),
            spurious: AtomicUsize::new(0),
        }
    }

    /// Queues `bytes` and starts draining if the engine is idle.
    pub fn send(&self, bytes: &[u8]) {
        self.ring.enqueue(bytes);
        self.kick();
    }

    /// Starts a transfer if the engine is idle and data is queued.
    ///
    /// Returns true if a transfer was started. Never blocks.
    pub fn kick(&self) -> bool {
        let mut state = self.state.lock();
        self.kick_locked(&mut state)
    }

    /// Completion notification: `transferred` bytes have left the hardware.
    ///
    /// Advances `tail`, returns to `Idle` and immediately tries the next
    /// transfer, all under one critical section. A notification while idle
    /// is counted as spurious and otherwise ignored.
    pub fn on_transfer_complete(&self, transferred: usize) {
        let mut state = self.state.lock();
        self.complete_locked(&mut state, transferred);
    }

    /// Interrupt entry for transports that report completion through
    /// [`Transport::poll_complete`]. Returns true if a completion was handled.
    pub fn service_interrupt(&self) -> bool {
        let mut state = self.state.lock();
        match state.transport.poll_complete() {
            Some(transferred) => {
                self.complete_locked(&mut state, transferred);
                true
            }
            None => false,
        }
    }

    /// Drops everything that has not been handed to the hardware yet.
    ///
    /// When idle the cursors return to zero. When a transfer is in flight its
    /// bytes are kept so the pending completion still lines up with `tail`.
    pub fn reset(&self) {
        let state = self.state.lock();
        match state.status {
            TxStatus::Idle => self.ring.reset(),
            TxStatus::Sending => self.ring.truncate(state.in_flight),
        }
    }

    /// Current state.
    pub fn status(&self) -> TxStatus {
        self.state.lock().status
    }

    /// Bytes of the transfer currently in flight, zero when idle.
    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight
    }

    /// The underlying queue, for observation.
    pub fn ring(&self) -> &TxRingBuffer<N> {
        &self.ring
    }

    /// Shorthand for `ring().cursors()`.
    pub fn cursors(&self) -> Cursors {
        self.ring.cursors()
    }

    /// Bytes dropped because the queue was full.
    pub fn dropped_count(&self) -> usize {
        self.ring.dropped_count()
    }

    /// Transfers started since construction.
    pub fn transfer_count(&self) -> usize {
        self.transfers.load(Ordering::Relaxed)
    }

    /// Completion notifications that arrived with no transfer in flight.
    pub fn spurious_count(&self) -> usize {
        self.spurious.load(Ordering::Relaxed)
    }

    /// Runs `f` with exclusive access to the transport.
    ///
    /// Interrupts stay masked for the duration of `f`.
    pub fn with_transport<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut state = self.state.lock();
        f(&mut state.transport)
    }

    fn complete_locked(&self, state: &mut SpinLockGuard<'_, EngineState<T>>, transferred: usize) {
        if state.status != TxStatus::Sending {
            self.spurious.fetch_add(1, Ordering::Relaxed);
            return;
        }
        self.ring.advance_tail(transferred.min(state.in_flight));
        state.status = TxStatus::Idle;
        state.in_flight = 0;
        self.kick_locked(state);
    }

    fn kick_locked(&self, state: &mut SpinLockGuard<'_, EngineState<T>>) -> bool {
        if state.status == TxStatus::Sending {
            return false;
        }
        let max = match state.transport.mode() {
            TxMode::Interrupt => 1,
            TxMode::Dma => N,
        };
        let Some(region) = self.ring.pending_region(max) else {
            return false;
        };
        state.status = TxStatus::Sending;
        state.in_flight = region.len();
        self.transfers.fetch_add(1, Ordering::Relaxed);
        state.transport.start_transfer(region);
        true
    }
}

impl<T: Transport, const N: usize> LogSink for TxEngine<T, N> {
    fn write(&self, bytes: &[u8]) {
        self.send(bytes);
    }

    fn init(&self) {
        self.reset();
    }
}

impl<T: Transport, const N: usize> TxCompleteHandler for TxEngine<T, N> {
    fn tx_complete(&self, event: &TxCompletion) -> bool {
        let mut state = self.state.lock();
        if state.transport.port() != event.port {
            return false;
        }
        self.complete_locked(&mut state, event.transferred);
        true
    }
}
