// src/log/tests/mod.rs

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::vec::Vec;

use super::level::LogLevel;
use super::logger::Logger;
use super::sink::{LogSink, NullSink};

// ========== 测试辅助 ==========

/// Sink that keeps everything it is given, one entry per write.
#[derive(Default)]
pub(super) struct RecordingSink {
    writes: Mutex<Vec<Vec<u8>>>,
    inits: AtomicUsize,
    flushes: AtomicUsize,
}

impl RecordingSink {
    pub(super) fn messages(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap().clone()
    }

    pub(super) fn count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub(super) fn last(&self) -> Option<Vec<u8>> {
        self.writes.lock().unwrap().last().cloned()
    }
}

impl LogSink for RecordingSink {
    fn write(&self, bytes: &[u8]) {
        self.writes.lock().unwrap().push(bytes.to_vec());
    }

    fn init(&self) {
        self.inits.fetch_add(1, Ordering::Relaxed);
    }

    fn flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }
}

/// Logger over a single recording sink, initialized at `level`.
pub(super) fn recording_logger(level: LogLevel) -> Logger<RecordingSink> {
    let log = Logger::with_uart(RecordingSink::default());
    log.init();
    log.set_level(level);
    log
}

/// 测试专用日志宏
macro_rules! test_log {
    ($logger:expr, $level:expr, $($arg:tt)*) => {
        $logger.log($level, format_args!($($arg)*))
    };
}

mod isolation;
