use std::time::Duration;

use crate::{RunOutcome, Stage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A pipeline stage began.
    StageStarted(Stage),
    /// A fetch attempt is about to be made.
    AttemptStarted {
        attempt: u32,
        max_attempts: u32,
        source: String,
    },
    /// A fetch attempt failed; `retry_in` is `None` when no retry follows.
    AttemptFailed {
        attempt: u32,
        reason: String,
        retry_in: Option<Duration>,
    },
    /// Fetched payload passed validation.
    DocumentAccepted { bytes: u64 },
    /// Text extraction finished.
    Extracted {
        pages_read: usize,
        total_pages: usize,
        chars: usize,
        truncated: bool,
        empty: bool,
    },
    /// An artifact reached its final name (or already had identical bytes).
    ArtifactWritten { file_name: String, changed: bool },
    /// The run is over.
    Finished(RunOutcome),
}
