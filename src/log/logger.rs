//! Logging facade
//!
//! This module encapsulates the filtering state and the attached sinks in a
//! single `Logger` value. Production code keeps one in a `static` and wires
//! the UART interrupt to it; tests build as many independent instances as
//! they like.

use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use super::filter::LogFilter;
use super::level::LogLevel;
use super::message::MessageBuf;
use super::sink::{LogSink, NullSink};
use crate::config::{DEFAULT_LOG_LEVEL, LOG_BUFFER_SIZE};
use crate::tx::{TxCompleteHandler, TxCompletion};

/// Level-filtered logger dispatching to a transport sink and an optional
/// storage sink.
///
/// # Thread Safety
///
/// Filtering state is atomic and the sinks synchronize themselves, so the
/// logger can be shared by reference between the main loop and interrupt
/// handlers.
///
/// # Examples
///
/// ```ignore
/// static LOGGER: Logger<TxEngine<Ns16550Tx>> =
///     Logger::new(TxEngine::new(unsafe { Ns16550Tx::new(UART0_BASE) }), NullSink);
///
/// LOGGER.init();
/// pr_info!(LOGGER, "boot ok, {} KiB free", free / 1024);
/// ```
pub struct Logger<U, P = NullSink> {
    filter: LogFilter,
    /// Asynchronous transport sink
    uart: U,
    /// Synchronous persistent sink
    storage: P,
    truncated: AtomicUsize,
}

impl<U: LogSink> Logger<U, NullSink> {
    /// Creates a logger with only a transport sink.
    pub const fn with_uart(uart: U) -> Self {
        Self::new(uart, NullSink)
    }
}

impl<U: LogSink, P: LogSink> Logger<U, P> {
    /// Creates a logger around the given sinks.
    ///
    /// The threshold starts at [`DEFAULT_LOG_LEVEL`], and logging stays
    /// disabled until [`init`](Self::init) is called. Messages logged before
    /// that are discarded, not queued.
    pub const fn new(uart: U, storage: P) -> Self {
        Self {
            filter: LogFilter::new(DEFAULT_LOG_LEVEL, false),
            uart,
            storage,
            truncated: AtomicUsize::new(0),
        }
    }

    /// Resets the transport queue, enables logging and opens the storage
    /// sink.
    pub fn init(&self) {
        self.uart.init();
        self.storage.init();
        self.filter.set_enabled(true);
    }

    /// Core logging implementation
    ///
    /// 1. Early return if disabled or filtered, before any formatting
    /// 2. Format into a bounded stack buffer
    /// 3. Hand the same bytes to each sink
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.filter.allows(level) {
            return;
        }

        let msg = MessageBuf::<LOG_BUFFER_SIZE>::from_args(args);
        if msg.is_truncated() {
            self.truncated.fetch_add(1, Ordering::Relaxed);
        }

        self.uart.write(msg.as_bytes());
        self.storage.write(msg.as_bytes());
    }

    /// Logs a preformatted string.
    pub fn log_str(&self, level: LogLevel, message: &str) {
        self.log(level, format_args!("{}", message));
    }

    /// Returns true if a message at `level` would currently be dispatched.
    #[inline(always)]
    pub fn is_level_enabled(&self, level: LogLevel) -> bool {
        self.filter.allows(level)
    }

    /// Sets the level threshold. Messages with a larger level value are
    /// discarded from the next call on.
    pub fn set_level(&self, level: LogLevel) {
        self.filter.set_level(level);
    }

    /// Gets the level threshold.
    pub fn level(&self) -> LogLevel {
        self.filter.level()
    }

    /// Suppresses every message, whatever its level.
    ///
    /// Bytes already queued for the transport still go out.
    pub fn disable(&self) {
        self.filter.set_enabled(false);
    }

    /// Re-enables logging without touching the sinks.
    pub fn enable(&self) {
        self.filter.set_enabled(true);
    }

    /// State of the master switch.
    pub fn is_enabled(&self) -> bool {
        self.filter.is_enabled()
    }

    /// Forces the storage sink to commit. The transport is fire-and-forget
    /// and has nothing to flush.
    pub fn flush(&self) {
        self.uart.flush();
        self.storage.flush();
    }

    /// The transport sink, e.g. to deliver completion interrupts.
    pub fn uart(&self) -> &U {
        &self.uart
    }

    /// The storage sink.
    pub fn storage(&self) -> &P {
        &self.storage
    }

    /// Messages that were cut to fit the format buffer.
    pub fn truncated_count(&self) -> usize {
        self.truncated.load(Ordering::Relaxed)
    }
}

impl<U: LogSink + TxCompleteHandler, P> TxCompleteHandler for Logger<U, P> {
    fn tx_complete(&self, event: &TxCompletion) -> bool {
        self.uart.tx_complete(event)
    }
}
