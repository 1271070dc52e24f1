use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Validating,
    Extracting,
    Rendering,
    Publishing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetch",
            Stage::Validating => "validate",
            Stage::Extracting => "extract",
            Stage::Rendering => "render",
            Stage::Publishing => "publish",
        };
        f.write_str(name)
    }
}

/// Result of one scheduled run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Everything published, latest pointers promoted.
    Success,
    /// Published with a visible warning, latest pointers promoted.
    Degraded { warning: String },
    /// Nothing promoted; the previous latest pointers are still served.
    Failed { stage: Stage, reason: String },
}

impl RunOutcome {
    pub fn is_published(&self) -> bool {
        !matches!(self, RunOutcome::Failed { .. })
    }

    /// Process exit code: 0 when published (even degraded), 1 on failure.
    pub fn exit_code(&self) -> u8 {
        if self.is_published() {
            0
        } else {
            1
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::Success => "success",
            RunOutcome::Degraded { .. } => "degraded",
            RunOutcome::Failed { .. } => "failed",
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            RunOutcome::Degraded { warning } => Some(warning),
            _ => None,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Success => write!(f, "success"),
            RunOutcome::Degraded { warning } => write!(f, "degraded ({warning})"),
            RunOutcome::Failed { stage, reason } => write!(f, "failed at {stage}: {reason}"),
        }
    }
}
