//! Non-blocking serial logging for microcontrollers.
//!
//! Log calls format into a bounded stack buffer and push the bytes into a
//! fixed-size ring. A small state machine ([`tx::TxEngine`]) hands the ring
//! to the UART one transfer at a time and is advanced from the
//! transfer-complete interrupt, so neither the caller nor the interrupt
//! handler ever waits on the hardware. When the ring is full, bytes are
//! dropped and counted.
//!
//! ```text
//! pr_info!(LOGGER, ..)
//!     └─▶ Logger ──▶ TxEngine::send ──▶ TxRingBuffer::enqueue
//!            │                └─▶ kick() ──▶ Transport::start_transfer
//!            └─▶ StorageSink (optional, synchronous)
//!
//! UART IRQ ──▶ TxEngine::on_transfer_complete ──▶ advance tail, kick()
//! ```
#![cfg_attr(not(test), no_std)]

#[cfg(test)]
#[macro_use]
mod test;

pub mod config;
pub mod device;
pub mod log;
pub mod storage;
pub mod sync;
pub mod tx;

pub use crate::log::{LogLevel, LogSink, Logger, NullSink};
pub use storage::{Storage, StorageError, StorageSink};
pub use tx::{Transport, TxCompleteHandler, TxCompletion, TxEngine, TxMode, TxRegion, TxStatus};
