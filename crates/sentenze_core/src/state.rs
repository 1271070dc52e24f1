use crate::{RunOutcome, RunViewModel, Stage};

/// Accumulated progress of one run, folded from engine messages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunState {
    stage: Option<Stage>,
    attempts: u32,
    written: Vec<String>,
    unchanged: Vec<String>,
    outcome: Option<RunOutcome>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> RunViewModel {
        RunViewModel {
            stage: self.stage,
            attempts: self.attempts,
            written: self.written.clone(),
            unchanged: self.unchanged.clone(),
            outcome: self.outcome.clone(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub(crate) fn enter_stage(&mut self, stage: Stage) {
        self.stage = Some(stage);
    }

    pub(crate) fn record_attempt(&mut self, attempt: u32) {
        self.attempts = self.attempts.max(attempt);
    }

    pub(crate) fn record_artifact(&mut self, file_name: String, changed: bool) {
        if changed {
            self.written.push(file_name);
        } else {
            self.unchanged.push(file_name);
        }
    }

    pub(crate) fn finish(&mut self, outcome: RunOutcome) {
        self.outcome = Some(outcome);
    }
}
