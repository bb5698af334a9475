// src/tx/tests/mod.rs

use std::sync::{Arc, Mutex};
use std::vec::Vec;

use super::*;

// ========== 测试辅助 ==========

/// Records every transfer the engine starts, copying the bytes out while the
/// region is still valid.
#[derive(Clone)]
pub(super) struct MockTransport {
    mode: TxMode,
    port: usize,
    started: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockTransport {
    pub(super) fn new(mode: TxMode) -> Self {
        Self {
            mode,
            port: 0,
            started: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(super) fn on_port(mut self, port: usize) -> Self {
        self.port = port;
        self
    }

    pub(super) fn started(&self) -> Vec<Vec<u8>> {
        self.started.lock().unwrap().clone()
    }

    pub(super) fn start_count(&self) -> usize {
        self.started.lock().unwrap().len()
    }

    pub(super) fn last(&self) -> Option<Vec<u8>> {
        self.started.lock().unwrap().last().cloned()
    }
}

impl Transport for MockTransport {
    fn port(&self) -> usize {
        self.port
    }

    fn mode(&self) -> TxMode {
        self.mode
    }

    fn start_transfer(&mut self, region: TxRegion) {
        let bytes = unsafe { region.as_slice() }.to_vec();
        self.started.lock().unwrap().push(bytes);
    }
}

/// Completes transfers until the engine goes idle, collecting what was sent.
pub(super) fn drain<const N: usize>(
    engine: &TxEngine<MockTransport, N>,
    transport: &MockTransport,
) -> (Vec<u8>, usize) {
    let mut out = Vec::new();
    let mut completions = 0;
    while engine.status() == TxStatus::Sending {
        let chunk = transport.last().unwrap();
        out.extend_from_slice(&chunk);
        engine.on_transfer_complete(chunk.len());
        completions += 1;
    }
    (out, completions)
}
