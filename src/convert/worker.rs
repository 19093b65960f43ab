//! Background threads that run one conversion attempt each.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use super::{ConversionResult, Converter, FALLBACK_FAILURE_MESSAGE};

/// A conversion attempt that has run to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finished {
    pub seq: u64,
    pub result: ConversionResult,
}

/// Runs each conversion attempt on its own thread.
///
/// Attempts are never cancelled. Results come back in completion order,
/// which is not necessarily dispatch order.
pub struct ConversionWorker {
    converter: Arc<Converter>,
    tx: Sender<Finished>,
    rx: Receiver<Finished>,
    next_seq: u64,
}

impl ConversionWorker {
    pub fn new(converter: Arc<Converter>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            converter,
            tx,
            rx,
            next_seq: 1,
        }
    }

    /// Start converting `source` and return the attempt's sequence number.
    pub fn dispatch(&mut self, source: String) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;

        let converter = Arc::clone(&self.converter);
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = catch_unwind(AssertUnwindSafe(|| converter.convert(&source)))
                .unwrap_or_else(|_| {
                    tracing::warn!(seq, "conversion thread panicked");
                    ConversionResult::Failure {
                        message: FALLBACK_FAILURE_MESSAGE.to_string(),
                    }
                });
            let _ = tx.send(Finished { seq, result });
        });
        tracing::debug!(seq, "conversion dispatched");
        seq
    }

    /// Collect every attempt that finished since the last call.
    pub fn drain_finished(&self) -> Vec<Finished> {
        self.rx.try_iter().collect()
    }

    /// Block until the next attempt finishes.
    pub fn wait_finished(&self) -> Option<Finished> {
        self.rx.recv().ok()
    }
}

impl std::fmt::Debug for ConversionWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionWorker")
            .field("next_seq", &self.next_seq)
            .finish_non_exhaustive()
    }
}
