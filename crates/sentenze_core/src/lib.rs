//! Sentenze core: pure domain model and run-progress state machine.
mod artifact;
mod date;
mod effect;
mod msg;
mod outcome;
mod state;
mod update;
mod view_model;

pub use artifact::{artifact_file_name, ArtifactKind, ArtifactRole, LATEST_STEM, SNAPSHOT_PREFIX};
pub use date::{rome_utc_offset_hours, DateParseError, PublicationDate};
pub use effect::Effect;
pub use msg::Msg;
pub use outcome::{RunOutcome, Stage};
pub use state::RunState;
pub use update::update;
pub use view_model::RunViewModel;
