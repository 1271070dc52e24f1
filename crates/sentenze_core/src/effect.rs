/// Output requested by the progress state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Human-readable progress line for stdout.
    Status(String),
    /// Line that also deserves a warn-level log entry.
    Warning(String),
}
