//! Line-oriented envelope reader.
//!
//! A background thread parses one JSON envelope per input line and hands
//! them to the main loop over a bounded channel. Malformed lines are skipped
//! and counted, never fatal.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::io::{self, BufRead, BufReader};
use std::thread::{self, JoinHandle};

use crate::capture::types::CaptureEnvelope;

/// Channel capacity between the reader thread and the consumer.
const CHANNEL_CAPACITY: usize = 1024;

/// Counters reported by the reader thread when it finishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceStats {
    /// Envelopes successfully parsed and delivered.
    pub parsed: u64,
    /// Lines that were not valid envelopes.
    pub skipped: u64,
}

/// A capture source feeding envelopes from a line-oriented reader.
pub struct EnvelopeSource {
    receiver: Receiver<CaptureEnvelope>,
    handle: Option<JoinHandle<SourceStats>>,
}

impl EnvelopeSource {
    /// Spawn a reader thread over any line-oriented input.
    pub fn spawn<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (sender, receiver) = bounded(CHANNEL_CAPACITY);
        let handle = thread::spawn(move || read_loop(reader, sender));
        Self {
            receiver,
            handle: Some(handle),
        }
    }

    /// Read envelopes from standard input.
    pub fn stdin() -> Self {
        Self::spawn(BufReader::new(io::stdin()))
    }

    /// Get the receiver for parsed envelopes.
    ///
    /// The channel disconnects when the input is exhausted.
    pub fn receiver(&self) -> &Receiver<CaptureEnvelope> {
        &self.receiver
    }

    /// Wait for the reader thread to finish and return its counters.
    pub fn join(mut self) -> SourceStats {
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default()
    }
}

fn read_loop<R: BufRead>(reader: R, sender: Sender<CaptureEnvelope>) -> SourceStats {
    let mut stats = SourceStats::default();

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("capture input read error: {e}");
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<CaptureEnvelope>(trimmed) {
            Ok(envelope) => {
                stats.parsed += 1;
                // Consumer hung up; nothing left to do.
                if sender.send(envelope).is_err() {
                    break;
                }
            }
            Err(e) => {
                stats.skipped += 1;
                tracing::warn!("skipping malformed capture line: {e}");
            }
        }
    }

    stats
}
