//! Byte ring buffer feeding the transmit engine
//!
//! Single producer (the log call site), single consumer (the transfer
//! completion path). Both cursors live behind one [`SpinLock`]; the byte
//! storage sits outside the lock so a transfer can read its region while the
//! producer keeps appending behind `head`.

use core::cell::UnsafeCell;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicUsize, Ordering};

use super::transport::TxRegion;
use crate::config::LOG_RING_BUFFER_SIZE;
use crate::sync::{RawSpinLock, SpinLock};

/// Read/write cursor pair, both always in `[0, N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursors {
    /// Next slot the producer writes.
    pub head: usize,
    /// Oldest queued byte, next to be transmitted.
    pub tail: usize,
}

impl Cursors {
    const fn zero() -> Self {
        Self { head: 0, tail: 0 }
    }

    #[inline(always)]
    fn len<const N: usize>(&self) -> usize {
        (self.head + N - self.tail) % N
    }

    #[inline(always)]
    fn is_full<const N: usize>(&self) -> bool {
        (self.head + 1) % N == self.tail
    }
}

/// Fixed-capacity circular byte queue.
///
/// Holds at most `N - 1` bytes: one slot stays free so that `head == tail`
/// always means empty.
pub struct TxRingBuffer<const N: usize = LOG_RING_BUFFER_SIZE> {
    cursors: SpinLock<Cursors>,
    storage: UnsafeCell<[u8; N]>,
    /// Bytes rejected because the buffer was full
    dropped: AtomicUsize,
}

// Safety: storage slots are written only by the producer at `head` (under the
// cursor lock) and read only inside `[tail, head)`, which the producer never
// writes.
unsafe impl<const N: usize> Sync for TxRingBuffer<N> {}

impl<const N: usize> TxRingBuffer<N> {
    /// Creates an empty buffer. Usable in `static` initializers.
    pub const fn new() -> Self {
        assert!(N >= 2, "ring buffer needs at least two slots");
        Self {
            cursors: SpinLock::const_new(RawSpinLock::new(), Cursors::zero()),
            storage: UnsafeCell::new([0; N]),
            dropped: AtomicUsize::new(0),
        }
    }

    /// Total slot count `N`.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Appends `bytes` in order.
    ///
    /// Each byte is checked and stored under its own short critical section.
    /// The first byte that finds the buffer full is dropped together with
    /// everything after it; the loss is only visible in [`dropped_count`].
    ///
    /// [`dropped_count`]: Self::dropped_count
    pub fn enqueue(&self, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            let mut cursors = self.cursors.lock();
            if cursors.is_full::<N>() {
                drop(cursors);
                self.dropped.fetch_add(bytes.len() - i, Ordering::Relaxed);
                return;
            }
            unsafe { self.slot_ptr(cursors.head).write(byte) };
            cursors.head = (cursors.head + 1) % N;
        }
    }

    /// Length of the queued run starting at `tail` that does not wrap past
    /// the end of the array.
    pub fn peek_contiguous_run(&self) -> usize {
        let cursors = self.cursors.lock();
        if cursors.head >= cursors.tail {
            cursors.head - cursors.tail
        } else {
            N - cursors.tail
        }
    }

    /// Moves `tail` forward by `n` slots, never past `head`.
    ///
    /// Consumer path only, after a confirmed transfer completion.
    pub fn advance_tail(&self, n: usize) {
        let mut cursors = self.cursors.lock();
        let n = n.min(cursors.len::<N>());
        cursors.tail = (cursors.tail + n) % N;
    }

    /// Number of queued bytes.
    pub fn len(&self) -> usize {
        self.cursors.lock().len::<N>()
    }

    /// True when no bytes are queued.
    pub fn is_empty(&self) -> bool {
        let cursors = self.cursors.lock();
        cursors.head == cursors.tail
    }

    /// True when the next enqueued byte would be dropped.
    pub fn is_full(&self) -> bool {
        self.cursors.lock().is_full::<N>()
    }

    /// Consistent snapshot of both cursors.
    pub fn cursors(&self) -> Cursors {
        *self.cursors.lock()
    }

    /// Bytes dropped on overflow since construction.
    pub fn dropped_count(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Resets both cursors to zero, discarding queued bytes.
    pub fn reset(&self) {
        *self.cursors.lock() = Cursors::zero();
    }

    /// Discards every queued byte after the first `keep`, counted from `tail`.
    pub(super) fn truncate(&self, keep: usize) {
        let mut cursors = self.cursors.lock();
        let keep = keep.min(cursors.len::<N>());
        cursors.head = (cursors.tail + keep) % N;
    }

    /// Region of up to `max` bytes starting at `tail`, not wrapping.
    pub(super) fn pending_region(&self, max: usize) -> Option<TxRegion> {
        let cursors = self.cursors.lock();
        let run = if cursors.head >= cursors.tail {
            cursors.head - cursors.tail
        } else {
            N - cursors.tail
        };
        let len = run.min(max);
        if len == 0 {
            return None;
        }
        let ptr = NonNull::new(self.slot_ptr(cursors.tail))?;
        Some(TxRegion::new(ptr, len))
    }

    #[inline(always)]
    fn slot_ptr(&self, index: usize) -> *mut u8 {
        debug_assert!(index < N);
        unsafe { (self.storage.get() as *mut u8).add(index) }
    }
}

impl<const N: usize> Default for TxRingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
