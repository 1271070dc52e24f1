use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use sentenze_core::{RunOutcome, Stage};

use crate::persist::WriteStatus;
use crate::validate::ContentMismatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Pdf,
    Text,
}

/// Raw payload of one run, as handed over by a source provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub bytes: Bytes,
    pub kind: ContentKind,
    /// Log-safe identifier of where the bytes came from.
    pub source: String,
    pub retrieved_at: DateTime<Utc>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub pages_read: usize,
    pub total_pages: usize,
    pub chars: usize,
    pub truncated: bool,
    pub is_empty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    StageStarted(Stage),
    AttemptStarted {
        attempt: u32,
        max_attempts: u32,
        source: String,
    },
    AttemptFailed {
        attempt: u32,
        error: FetchError,
        retry_in: Option<Duration>,
    },
    DocumentAccepted {
        bytes: u64,
        kind: ContentKind,
    },
    Extracted(ExtractionSummary),
    ArtifactWritten {
        path: PathBuf,
        status: WriteStatus,
    },
    Finished(RunOutcome),
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}

/// Sink for callers that do not report progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn emit(&self, _event: PipelineEvent) {}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Transient failures are worth another attempt; permanent ones signal a
    /// misconfigured source.
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

impl From<ContentMismatchError> for FetchError {
    fn from(err: ContentMismatchError) -> Self {
        FetchError::new(FailureKind::ContentMismatch, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Connect,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    ContentMismatch,
    SourceMissing,
    Io,
    Network,
}

impl FailureKind {
    pub fn is_transient(&self) -> bool {
        match self {
            FailureKind::HttpStatus(code) => *code >= 500 || *code == 408 || *code == 429,
            FailureKind::Timeout
            | FailureKind::Connect
            | FailureKind::ContentMismatch
            | FailureKind::Io
            | FailureKind::Network => true,
            FailureKind::InvalidUrl
            | FailureKind::RedirectLimitExceeded
            | FailureKind::TooLarge { .. }
            | FailureKind::SourceMissing => false,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Connect => write!(f, "connection failed"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::ContentMismatch => write!(f, "content mismatch"),
            FailureKind::SourceMissing => write!(f, "source missing"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
