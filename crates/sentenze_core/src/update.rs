use std::time::Duration;

use crate::{Effect, Msg, RunOutcome, RunState};

/// Pure update function: applies a progress message to state and returns the
/// lines to report.
pub fn update(mut state: RunState, msg: Msg) -> (RunState, Vec<Effect>) {
    // A finished run is terminal; late messages are dropped.
    if state.is_finished() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::StageStarted(stage) => {
            state.enter_stage(stage);
            Vec::new()
        }
        Msg::AttemptStarted {
            attempt,
            max_attempts,
            source,
        } => {
            state.record_attempt(attempt);
            vec![Effect::Status(format!(
                "[download] Attempt {attempt}/{max_attempts} -> {source}"
            ))]
        }
        Msg::AttemptFailed {
            attempt,
            reason,
            retry_in,
        } => {
            let mut effects = vec![Effect::Warning(format!(
                "[download] Attempt {attempt} error: {reason}"
            ))];
            if let Some(delay) = retry_in {
                effects.push(Effect::Status(format!(
                    "[download] Retry in {}...",
                    format_delay(delay)
                )));
            }
            effects
        }
        Msg::DocumentAccepted { bytes } => {
            vec![Effect::Status(format!("[download] OK ({bytes} bytes)"))]
        }
        Msg::Extracted {
            pages_read,
            total_pages,
            chars,
            truncated,
            empty,
        } => {
            if empty {
                vec![Effect::Warning(format!(
                    "[extract] No extractable text in {pages_read}/{total_pages} pages"
                ))]
            } else {
                let mut effects = vec![Effect::Status(format!(
                    "[extract] {chars} chars from {pages_read}/{total_pages} pages"
                ))];
                if truncated {
                    effects.push(Effect::Status(
                        "[extract] Text cut at the character budget".to_string(),
                    ));
                }
                effects
            }
        }
        Msg::ArtifactWritten { file_name, changed } => {
            let line = if changed {
                format!(" - {file_name}")
            } else {
                format!(" - {file_name} (unchanged)")
            };
            state.record_artifact(file_name, changed);
            vec![Effect::Status(line)]
        }
        Msg::Finished(outcome) => {
            let effect = match &outcome {
                RunOutcome::Success => Effect::Status("[OK] Published".to_string()),
                RunOutcome::Degraded { warning } => {
                    Effect::Warning(format!("[OK] Published with warning: {warning}"))
                }
                RunOutcome::Failed { stage, reason } => Effect::Warning(format!(
                    "[FAILED] {stage}: {reason}; latest artifacts left untouched"
                )),
            };
            state.finish(outcome);
            vec![effect]
        }
    };

    (state, effects)
}

fn format_delay(delay: Duration) -> String {
    if delay.subsec_millis() == 0 {
        format!("{}s", delay.as_secs())
    } else {
        format!("{}ms", delay.as_millis())
    }
}
