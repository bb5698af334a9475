//! Concrete UART back ends
//!
//! Both are optional: any [`Transport`](crate::tx::Transport) or
//! [`LogSink`](crate::log::LogSink) implementation can take their place.
pub mod blocking;
pub mod uart16550;

pub use blocking::{BlockingSerialSink, SerialWrite};
pub use uart16550::Ns16550Tx;
