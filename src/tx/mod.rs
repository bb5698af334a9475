//! Asynchronous transmit pipeline
//!
//! [`TxRingBuffer`] queues bytes, [`TxEngine`] moves them to the hardware one
//! transfer at a time, and the [`Transport`] trait is the seam to the actual
//! UART or DMA controller.
mod engine;
mod ring_buffer;
mod transport;

pub use engine::{TxEngine, TxStatus};
pub use ring_buffer::{Cursors, TxRingBuffer};
pub use transport::{
    TxCompleteHandler, TxCompletion, TxMode, TxRegion, Transport, dispatch_tx_complete,
};

#[cfg(test)]
mod tests;
