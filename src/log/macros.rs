//! Logging macros
//!
//! Linux kernel-style `pr_*` macros. The first argument is the logger (any
//! expression that derefs to a [`Logger`](super::Logger)); the rest is a
//! normal format string.
//!
//! # Usage
//!
//! ```ignore
//! pr_info!(LOGGER, "System initialized");
//! pr_err!(LOGGER, "Failed to allocate {} bytes", size);
//! pr_warn!(LOGGER, "Memory usage at {}%", percent);
//! pr_debug!(LOGGER, "Variable x = {}", x);
//! ```
//!
//! # Performance
//!
//! The level is checked before `format_args!` is built, so a filtered call
//! never evaluates its format arguments.

/// Internal implementation macro with level filtering
#[doc(hidden)]
#[macro_export]
macro_rules! __log_impl_filtered {
    ($logger:expr, $level:expr, $($arg:tt)*) => {{
        let logger = &$logger;
        if logger.is_level_enabled($level) {
            logger.log($level, format_args!($($arg)*));
        }
    }};
}

/// Logs a message at the ERROR level
///
/// # Examples
///
/// ```ignore
/// pr_err!(LOGGER, "Device initialization failed: {}", error);
/// ```
#[macro_export]
macro_rules! pr_err {
    ($logger:expr, $($arg:tt)*) => {
        $crate::__log_impl_filtered!($logger, $crate::log::LogLevel::Error, $($arg)*)
    };
}

/// Logs a message at the WARNING level
#[macro_export]
macro_rules! pr_warn {
    ($logger:expr, $($arg:tt)*) => {
        $crate::__log_impl_filtered!($logger, $crate::log::LogLevel::Warning, $($arg)*)
    };
}

/// Logs a message at the INFO level
///
/// # Examples
///
/// ```ignore
/// pr_info!(LOGGER, "Starting subsystem {}", name);
/// ```
#[macro_export]
macro_rules! pr_info {
    ($logger:expr, $($arg:tt)*) => {
        $crate::__log_impl_filtered!($logger, $crate::log::LogLevel::Info, $($arg)*)
    };
}

/// Logs a message at the DEBUG level
///
/// These are typically filtered out in production builds.
#[macro_export]
macro_rules! pr_debug {
    ($logger:expr, $($arg:tt)*) => {
        $crate::__log_impl_filtered!($logger, $crate::log::LogLevel::Debug, $($arg)*)
    };
}
