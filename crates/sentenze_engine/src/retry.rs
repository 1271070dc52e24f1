use std::time::Duration;

use engine_logging::{engine_info, engine_warn};

use crate::fetch::SourceProvider;
use crate::validate::validate;
use crate::{FailureKind, FetchError, PipelineEvent, ProgressSink, SourceDocument};

/// Exponential backoff: attempt `n` failing waits `base_delay * 2^(n-1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub document: SourceDocument,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("fetch failed after {attempts} attempt(s): {last}")]
pub struct RetryExhausted {
    pub attempts: u32,
    pub last: FetchError,
}

impl RetryExhausted {
    pub fn is_content_mismatch(&self) -> bool {
        self.last.kind == FailureKind::ContentMismatch
    }
}

/// Fetch-and-validate cycle. A payload that fails validation counts as a
/// failed attempt, like a network error; permanent errors stop immediately.
pub async fn fetch_validated(
    provider: &dyn SourceProvider,
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    sink: &dyn ProgressSink,
) -> Result<Fetched, RetryExhausted> {
    let max_attempts = policy.max_attempts.max(1);
    let source = provider.describe();

    let mut attempt = 1;
    loop {
        engine_info!("[download] attempt {}/{} -> {}", attempt, max_attempts, source);
        sink.emit(PipelineEvent::AttemptStarted {
            attempt,
            max_attempts,
            source: source.clone(),
        });

        let result = match provider.fetch().await {
            Ok(document) => validate(&document).map(|_| document).map_err(FetchError::from),
            Err(err) => Err(err),
        };

        match result {
            Ok(document) => {
                engine_info!("[download] OK ({} bytes)", document.bytes.len());
                sink.emit(PipelineEvent::DocumentAccepted {
                    bytes: document.bytes.len() as u64,
                    kind: document.kind,
                });
                return Ok(Fetched {
                    document,
                    attempts: attempt,
                });
            }
            Err(err) => {
                let retry_in = (err.is_transient() && attempt < max_attempts)
                    .then(|| policy.delay_after(attempt));
                engine_warn!(
                    "[download] attempt {} failed ({}), retry in {:?}",
                    attempt,
                    err,
                    retry_in
                );
                sink.emit(PipelineEvent::AttemptFailed {
                    attempt,
                    error: err.clone(),
                    retry_in,
                });
                match retry_in {
                    Some(delay) => sleeper.sleep(delay).await,
                    None => {
                        return Err(RetryExhausted {
                            attempts: attempt,
                            last: err,
                        })
                    }
                }
            }
        }
        attempt += 1;
    }
}
