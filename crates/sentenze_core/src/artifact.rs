use crate::PublicationDate;

pub const SNAPSHOT_PREFIX: &str = "sentenza_";
pub const LATEST_STEM: &str = "latest";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Copy of a fetched PDF document.
    Pdf,
    /// Copy of a fetched plain-text document.
    Text,
    /// Rendered summary page.
    Html,
    /// Run manifest.
    Manifest,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "pdf",
            ArtifactKind::Text => "txt",
            ArtifactKind::Html => "html",
            ArtifactKind::Manifest => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactRole {
    /// Immutable, keyed by publication date.
    Snapshot,
    /// Mutable pointer to the most recent successful run.
    Latest,
}

/// `sentenza_<YYYY-MM-DD>.<ext>` for snapshots, `latest.<ext>` for pointers.
pub fn artifact_file_name(kind: ArtifactKind, role: ArtifactRole, date: PublicationDate) -> String {
    match role {
        ArtifactRole::Snapshot => format!("{SNAPSHOT_PREFIX}{date}.{}", kind.extension()),
        ArtifactRole::Latest => format!("{LATEST_STEM}.{}", kind.extension()),
    }
}
