//! Persistent storage sink
//!
//! The storage itself (a FAT file on an SD card, a flash log partition, ...)
//! is an external collaborator reached through [`Storage`]. [`StorageSink`]
//! adapts it to [`LogSink`]: it opens the storage on `init`, appends every
//! message, syncs on `flush`, and swallows every failure so the transport
//! sink never notices.

use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use spin::Mutex;

use crate::log::LogSink;

/// Storage error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The medium is absent or was never mounted
    NotReady,
    /// The medium is full
    NoSpace,
    /// Low-level read/write failure
    Io,
    /// The medium rejected the write as read-only
    ReadOnly,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            StorageError::NotReady => "storage not ready",
            StorageError::NoSpace => "no space left on storage",
            StorageError::Io => "storage I/O error",
            StorageError::ReadOnly => "storage is read-only",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for StorageError {}

/// Append-only persistent log target.
pub trait Storage {
    /// Opens the log for appending, creating it if needed.
    fn open(&mut self) -> Result<(), StorageError>;

    /// Appends `bytes`, returning how many were accepted.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, StorageError>;

    /// Durably commits everything written so far.
    fn sync(&mut self) -> Result<(), StorageError>;
}

struct StorageState<S> {
    storage: S,
    opened: bool,
}

/// [`LogSink`] over a [`Storage`] that never propagates failure.
///
/// Until `init` has opened the storage successfully, writes are no-ops. A
/// write that finds the sink busy (an interrupt logging while the main
/// context is mid-write) is dropped instead of waiting.
pub struct StorageSink<S> {
    state: Mutex<StorageState<S>>,
    failed_writes: AtomicUsize,
}

impl<S: Storage> StorageSink<S> {
    /// Wraps `storage`. Nothing is opened yet.
    pub const fn new(storage: S) -> Self {
        Self {
            state: Mutex::new(StorageState {
                storage,
                opened: false,
            }),
            failed_writes: AtomicUsize::new(0),
        }
    }

    /// True once `init` managed to open the storage.
    pub fn is_open(&self) -> bool {
        self.state.lock().opened
    }

    /// Messages that did not make it to storage: short writes, errors, or
    /// contention. Writes skipped because the sink was never opened are not
    /// counted.
    pub fn failed_writes(&self) -> usize {
        self.failed_writes.load(Ordering::Relaxed)
    }

    /// Runs `f` with exclusive access to the storage.
    pub fn with_storage<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.state.lock().storage)
    }
}

impl<S: Storage> LogSink for StorageSink<S> {
    fn write(&self, bytes: &[u8]) {
        let Some(mut state) = self.state.try_lock() else {
            self.failed_writes.fetch_add(1, Ordering::Relaxed);
            return;
        };
        if !state.opened {
            return;
        }
        match state.storage.write(bytes) {
            Ok(n) if n == bytes.len() => {}
            _ => {
                self.failed_writes.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn init(&self) {
        let mut state = self.state.lock();
        state.opened = state.storage.open().is_ok();
    }

    fn flush(&self) {
        let mut state = self.state.lock();
        if state.opened {
            // a failed sync only costs durability
            let _ = state.storage.sync();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemStorage {
        data: Vec<u8>,
        synced: usize,
        fail_open: bool,
        fail_write: Option<StorageError>,
        limit: Option<usize>,
    }

    impl Storage for MemStorage {
        fn open(&mut self) -> Result<(), StorageError> {
            if self.fail_open {
                Err(StorageError::NotReady)
            } else {
                Ok(())
            }
        }

        fn write(&mut self, bytes: &[u8]) -> Result<usize, StorageError> {
            if let Some(err) = self.fail_write {
                return Err(err);
            }
            let room = self.limit.map_or(bytes.len(), |l| l.saturating_sub(self.data.len()));
            let n = bytes.len().min(room);
            self.data.extend_from_slice(&bytes[..n]);
            Ok(n)
        }

        fn sync(&mut self) -> Result<(), StorageError> {
            self.synced = self.data.len();
            Ok(())
        }
    }

    test_case!(test_write_before_init_is_noop, {
        let sink = StorageSink::new(MemStorage::default());
        sink.write(b"early");
        kassert!(!sink.is_open());
        kassert!(sink.with_storage(|s| s.data.is_empty()));
        kassert!(sink.failed_writes() == 0);
    });

    test_case!(test_append_and_flush, {
        let sink = StorageSink::new(MemStorage::default());
        sink.init();
        sink.write(b"one ");
        sink.write(b"two");
        kassert!(sink.with_storage(|s| s.data == b"one two"));
        kassert!(sink.with_storage(|s| s.synced) == 0);
        sink.flush();
        kassert!(sink.with_storage(|s| s.synced) == 7);
    });

    test_case!(test_open_failure_disables_sink, {
        let sink = StorageSink::new(MemStorage {
            fail_open: true,
            ..Default::default()
        });
        sink.init();
        kassert!(!sink.is_open());
        sink.write(b"lost");
        sink.flush();
        kassert!(sink.with_storage(|s| s.data.is_empty() && s.synced == 0));
    });

    test_case!(test_write_errors_are_counted, {
        let sink = StorageSink::new(MemStorage {
            fail_write: Some(StorageError::Io),
            ..Default::default()
        });
        sink.init();
        sink.write(b"a");
        sink.write(b"b");
        kassert!(sink.failed_writes() == 2);
    });

    test_case!(test_short_write_is_a_failure, {
        let sink = StorageSink::new(MemStorage {
            limit: Some(4),
            ..Default::default()
        });
        sink.init();
        sink.write(b"abcdef");
        kassert!(sink.failed_writes() == 1);
        kassert!(sink.with_storage(|s| s.data == b"abcd"));
    });

    test_case!(test_busy_sink_drops_message, {
        let sink = StorageSink::new(MemStorage::default());
        sink.init();
        let held = sink.state.lock();
        sink.write(b"from irq");
        drop(held);
        kassert!(sink.failed_writes() == 1);
        kassert!(sink.with_storage(|s| s.data.is_empty()));
    });

    test_case!(test_error_display, {
        kassert!(std::format!("{}", StorageError::NoSpace) == "no space left on storage");
    });
}
