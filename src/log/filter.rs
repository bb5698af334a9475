//! Runtime level threshold and master switch
//!
//! Both values are read on every log call and written rarely, from any
//! context. Stores use `Release` and loads use `Acquire`, so a caller that
//! observes a new threshold also observes everything written before it was
//! set.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use super::level::LogLevel;

/// Threshold plus enable flag.
pub struct LogFilter {
    level: AtomicU8,
    enabled: AtomicBool,
}

impl LogFilter {
    /// Creates a filter with the given threshold and enable state.
    pub const fn new(level: LogLevel, enabled: bool) -> Self {
        Self {
            level: AtomicU8::new(level as u8),
            enabled: AtomicBool::new(enabled),
        }
    }

    /// True if a message at `level` should be formatted and dispatched.
    ///
    /// A message is rejected when its value is numerically greater than the
    /// threshold, or when logging is disabled.
    #[inline(always)]
    pub fn allows(&self, level: LogLevel) -> bool {
        self.enabled.load(Ordering::Acquire) && level as u8 <= self.level.load(Ordering::Acquire)
    }

    /// Sets the threshold.
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Release);
    }

    /// Gets the threshold.
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Acquire))
    }

    /// Turns the master switch on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// State of the master switch.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}
