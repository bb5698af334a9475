//! Logging facade: level filtering, bounded formatting and sink dispatch
pub mod bridge;
pub mod filter;
pub mod level;
pub mod logger;
pub mod macros;
pub mod message;
pub mod sink;

pub use filter::LogFilter;
pub use level::LogLevel;
pub use logger::Logger;
pub use message::MessageBuf;
pub use sink::{LogSink, NullSink};

#[cfg(test)]
mod tests;
