use std::sync::Mutex;

use engine_logging::engine_warn;
use sentenze_core::{update, Effect, Msg, RunState};
use sentenze_engine::{PipelineEvent, ProgressSink, WriteStatus};

/// Folds engine events through the core state machine and prints the
/// resulting status lines.
#[derive(Default)]
pub struct ConsoleProgress {
    state: Mutex<RunState>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one engine event through `update` and return the effects. The
    /// event that finishes the run also yields the summary line.
    pub fn apply(&self, event: PipelineEvent) -> Vec<Effect> {
        let msg = map_event(event);
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let was_finished = guard.is_finished();
        let (next, mut effects) = update(std::mem::take(&mut *guard), msg);
        if !was_finished {
            if let Some(line) = next.view().summary_line() {
                effects.push(Effect::Status(line));
            }
        }
        *guard = next;
        effects
    }
}

impl ProgressSink for ConsoleProgress {
    fn emit(&self, event: PipelineEvent) {
        for effect in self.apply(event) {
            match effect {
                Effect::Status(line) => println!("{line}"),
                Effect::Warning(line) => {
                    engine_warn!("{}", line);
                    println!("{line}");
                }
            }
        }
    }
}

fn map_event(event: PipelineEvent) -> Msg {
    match event {
        PipelineEvent::StageStarted(stage) => Msg::StageStarted(stage),
        PipelineEvent::AttemptStarted {
            attempt,
            max_attempts,
            source,
        } => Msg::AttemptStarted {
            attempt,
            max_attempts,
            source,
        },
        PipelineEvent::AttemptFailed {
            attempt,
            error,
            retry_in,
        } => Msg::AttemptFailed {
            attempt,
            reason: error.to_string(),
            retry_in,
        },
        PipelineEvent::DocumentAccepted { bytes, .. } => Msg::DocumentAccepted { bytes },
        PipelineEvent::Extracted(summary) => Msg::Extracted {
            pages_read: summary.pages_read,
            total_pages: summary.total_pages,
            chars: summary.chars,
            truncated: summary.truncated,
            empty: summary.is_empty,
        },
        PipelineEvent::ArtifactWritten { path, status } => Msg::ArtifactWritten {
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            changed: status == WriteStatus::Written,
        },
        PipelineEvent::Finished(outcome) => Msg::Finished(outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::ConsoleProgress;
    use pretty_assertions::assert_eq;
    use sentenze_core::{Effect, RunOutcome};
    use sentenze_engine::{FailureKind, FetchError, PipelineEvent, WriteStatus};
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn failed_attempt_reports_error_and_retry() {
        let progress = ConsoleProgress::new();
        let effects = progress.apply(PipelineEvent::AttemptFailed {
            attempt: 1,
            error: FetchError::new(FailureKind::HttpStatus(503), "503 Service Unavailable"),
            retry_in: Some(Duration::from_secs(1)),
        });
        assert_eq!(
            effects,
            vec![
                Effect::Warning(
                    "[download] Attempt 1 error: http status 503: 503 Service Unavailable"
                        .to_string()
                ),
                Effect::Status("[download] Retry in 1s...".to_string()),
            ]
        );
    }

    #[test]
    fn artifacts_are_listed_by_file_name() {
        let progress = ConsoleProgress::new();
        let effects = progress.apply(PipelineEvent::ArtifactWritten {
            path: PathBuf::from("sentenze").join("latest.html"),
            status: WriteStatus::Unchanged,
        });
        assert_eq!(
            effects,
            vec![Effect::Status(" - latest.html (unchanged)".to_string())]
        );
    }

    #[test]
    fn finishing_prints_outcome_and_summary() {
        let progress = ConsoleProgress::new();
        progress.apply(PipelineEvent::ArtifactWritten {
            path: PathBuf::from("sentenze").join("latest.pdf"),
            status: WriteStatus::Written,
        });
        let effects = progress.apply(PipelineEvent::Finished(RunOutcome::Success));
        assert_eq!(
            effects,
            vec![
                Effect::Status("[OK] Published".to_string()),
                Effect::Status(
                    "[summary] success: 1 written, 0 unchanged, 0 attempt(s)".to_string()
                ),
            ]
        );
    }

    #[test]
    fn nothing_is_reported_after_the_run_finished() {
        let progress = ConsoleProgress::new();
        progress.apply(PipelineEvent::Finished(RunOutcome::Success));
        let effects = progress.apply(PipelineEvent::ArtifactWritten {
            path: PathBuf::from("latest.pdf"),
            status: WriteStatus::Written,
        });
        assert!(effects.is_empty());
    }
}
