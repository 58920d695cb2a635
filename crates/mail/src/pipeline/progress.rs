//! Progress reporting for a running pipeline

use std::path::PathBuf;
use std::sync::mpsc::Sender;

/// Incremental progress events, emitted in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Search is about to start
    Started { query: String },
    /// A result page arrived and its messages are about to be processed
    PageReceived { page: usize, messages: usize },
    /// Running total of downloaded attachments, after each message
    Downloaded { total: usize },
    /// The archive was written
    Archived { files: usize, path: PathBuf },
}

/// Receiver of progress events
///
/// Reporting is best-effort: a sink must not block the run and cannot fail it.
pub trait ProgressSink {
    fn report(&mut self, progress: Progress);
}

impl<F: FnMut(Progress)> ProgressSink for F {
    fn report(&mut self, progress: Progress) {
        self(progress)
    }
}

impl ProgressSink for Sender<Progress> {
    fn report(&mut self, progress: Progress) {
        // A dropped receiver just means nobody is watching
        let _ = self.send(progress);
    }
}

/// Discards all progress
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _progress: Progress) {}
}
