//! Logging configuration

use crate::log::LogLevel;

/// Size of the bounded buffer a single message is formatted into
pub const LOG_BUFFER_SIZE: usize = 256;

/// Capacity of the transmit ring buffer; one slot is always left unused
pub const LOG_RING_BUFFER_SIZE: usize = 1024;

/// Default log level
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

/// Port identifier used by transports that do not override [`Transport::port`]
///
/// [`Transport::port`]: crate::tx::Transport::port
pub const DEFAULT_LOG_PORT: usize = 0;
