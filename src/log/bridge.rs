//! `log` crate integration
//!
//! Lets code written against `log::info!` and friends feed the same
//! pipeline. Install a `'static` logger with [`install`].

use super::level::LogLevel;
use super::logger::Logger;
use super::sink::LogSink;

impl<U, P> ::log::Log for Logger<U, P>
where
    U: LogSink + Send + Sync,
    P: LogSink + Send + Sync,
{
    fn enabled(&self, metadata: &::log::Metadata<'_>) -> bool {
        self.is_level_enabled(LogLevel::from(metadata.level()))
    }

    fn log(&self, record: &::log::Record<'_>) {
        Logger::log(self, LogLevel::from(record.level()), *record.args());
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

/// Registers `logger` as the `log` crate's global logger.
///
/// `log::max_level` is opened up to the most verbose level the logger knows,
/// so the threshold stays with [`Logger::set_level`] and changes to it apply
/// to `log` macros too.
pub fn install<U, P>(logger: &'static Logger<U, P>) -> Result<(), ::log::SetLoggerError>
where
    U: LogSink + Send + Sync,
    P: LogSink + Send + Sync,
{
    ::log::set_logger(logger)?;
    ::log::set_max_level(LogLevel::Debug.into());
    Ok(())
}
