use crate::{RunOutcome, Stage};

/// Snapshot of a run for end-of-run reporting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunViewModel {
    pub stage: Option<Stage>,
    pub attempts: u32,
    pub written: Vec<String>,
    pub unchanged: Vec<String>,
    pub outcome: Option<RunOutcome>,
}

impl RunViewModel {
    /// One-line recap, available once the run has finished.
    pub fn summary_line(&self) -> Option<String> {
        let outcome = self.outcome.as_ref()?;
        let mut line = format!(
            "[summary] {}: {} written, {} unchanged, {} attempt(s)",
            outcome.label(),
            self.written.len(),
            self.unchanged.len(),
            self.attempts
        );
        if let Some(stage) = self.stage {
            line.push_str(&format!(", last stage {stage}"));
        }
        Some(line)
    }
}
