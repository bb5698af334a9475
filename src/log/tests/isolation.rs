// src/log/tests/isolation.rs
//
// 串口与存储两个输出互不影响

use std::sync::Arc;

use super::*;
use crate::storage::{Storage, StorageError, StorageSink};
use crate::tx::{Transport, TxEngine, TxMode, TxRegion, TxStatus};

/// Copies each started transfer; completion is driven by the test.
#[derive(Clone, Default)]
struct WireTransport {
    started: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl Transport for WireTransport {
    fn mode(&self) -> TxMode {
        TxMode::Dma
    }

    fn start_transfer(&mut self, region: TxRegion) {
        let bytes = unsafe { region.as_slice() }.to_vec();
        self.started.lock().unwrap().push(bytes);
    }
}

#[derive(Default)]
struct FlakyStorage {
    data: Vec<u8>,
    broken: bool,
    absent: bool,
}

impl Storage for FlakyStorage {
    fn open(&mut self) -> Result<(), StorageError> {
        if self.absent {
            return Err(StorageError::NotReady);
        }
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, StorageError> {
        if self.broken {
            return Err(StorageError::Io);
        }
        self.data.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn sync(&mut self) -> Result<(), StorageError> {
        if self.broken { Err(StorageError::Io) } else { Ok(()) }
    }
}

type TestLogger = Logger<TxEngine<WireTransport, 64>, StorageSink<FlakyStorage>>;

fn logger(storage: FlakyStorage) -> (TestLogger, WireTransport) {
    let wire = WireTransport::default();
    let log = Logger::new(TxEngine::new(wire.clone()), StorageSink::new(storage));
    log.init();
    (log, wire)
}

fn drain(log: &TestLogger, wire: &WireTransport) -> Vec<u8> {
    let mut out = Vec::new();
    while log.uart().status() == TxStatus::Sending {
        let chunk = wire.started.lock().unwrap().last().cloned().unwrap();
        out.extend_from_slice(&chunk);
        log.uart().on_transfer_complete(chunk.len());
    }
    out
}

test_case!(test_both_sinks_receive_message, {
    let (log, wire) = logger(FlakyStorage::default());

    test_log!(log, LogLevel::Info, "temp={}C\r\n", 21);
    log.flush();

    kassert!(drain(&log, &wire) == b"temp=21C\r\n");
    kassert!(log.storage().with_storage(|s| s.data == b"temp=21C\r\n"));
});

test_case!(test_failing_storage_does_not_block_uart, {
    let (log, wire) = logger(FlakyStorage {
        broken: true,
        ..Default::default()
    });

    test_log!(log, LogLevel::Error, "disk gone");
    log.flush();

    kassert!(drain(&log, &wire) == b"disk gone");
    kassert!(log.storage().failed_writes() == 1);
});

test_case!(test_absent_storage_is_noop, {
    let (log, wire) = logger(FlakyStorage {
        absent: true,
        ..Default::default()
    });

    test_log!(log, LogLevel::Warning, "no card");

    kassert!(!log.storage().is_open());
    kassert!(drain(&log, &wire) == b"no card");
    kassert!(log.storage().with_storage(|s| s.data.is_empty()));
});

test_case!(test_stalled_uart_does_not_block_storage, {
    let (log, _wire) = logger(FlakyStorage::default());

    // the first transfer never completes; the 64-byte ring fills up
    for i in 0..20 {
        test_log!(log, LogLevel::Info, "line {:02}\n", i);
    }

    kassert!(log.uart().status() == TxStatus::Sending);
    kassert!(log.uart().dropped_count() == 20 * 8 - 63);
    kassert!(log.storage().with_storage(|s| s.data.len()) == 20 * 8);
});

test_case!(test_init_resets_queue, {
    let (log, wire) = logger(FlakyStorage::default());
    test_log!(log, LogLevel::Info, "abc");
    drain(&log, &wire);
    kassert!(log.uart().cursors().head == 3);

    log.init();
    kassert!(log.uart().cursors().head == 0);
    kassert!(log.uart().ring().is_empty());
});
