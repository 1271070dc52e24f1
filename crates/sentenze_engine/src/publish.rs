use bytes::Bytes;
use engine_logging::{engine_debug, engine_error};
use sentenze_core::{artifact_file_name, ArtifactKind, ArtifactRole, PublicationDate};

use crate::persist::{AtomicFileWriter, PersistError, StagedWrite, WrittenArtifact};
use crate::{PipelineEvent, ProgressSink};

/// Two-phase storage for published files: `stage` writes a complete temporary
/// sibling, `commit` renames it over the final name.
pub trait ArtifactStore: Send + Sync {
    fn stage(&self, file_name: &str, content: &[u8]) -> Result<StagedWrite, PersistError>;
    fn commit(&self, staged: StagedWrite) -> Result<WrittenArtifact, PersistError>;
}

impl ArtifactStore for AtomicFileWriter {
    fn stage(&self, file_name: &str, content: &[u8]) -> Result<StagedWrite, PersistError> {
        AtomicFileWriter::stage(self, file_name, content)
    }

    fn commit(&self, staged: StagedWrite) -> Result<WrittenArtifact, PersistError> {
        AtomicFileWriter::commit(self, staged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub role: ArtifactRole,
    pub file_name: String,
    pub content: Bytes,
}

impl Artifact {
    pub fn new(
        kind: ArtifactKind,
        role: ArtifactRole,
        date: PublicationDate,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            kind,
            role,
            file_name: artifact_file_name(kind, role, date),
            content: content.into(),
        }
    }
}

/// Files of one run: dated snapshots first, then the latest pointers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSet {
    pub snapshots: Vec<Artifact>,
    pub latest: Vec<Artifact>,
}

impl PublishSet {
    /// Each payload published both as a dated snapshot and as a latest pointer,
    /// latest pointers in the given order.
    pub fn mirrored(date: PublicationDate, payloads: Vec<(ArtifactKind, Bytes)>) -> Self {
        let snapshots = payloads
            .iter()
            .map(|(kind, content)| Artifact::new(*kind, ArtifactRole::Snapshot, date, content.clone()))
            .collect();
        let latest = payloads
            .into_iter()
            .map(|(kind, content)| Artifact::new(kind, ArtifactRole::Latest, date, content))
            .collect();
        Self { snapshots, latest }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PublishReport {
    pub snapshots: Vec<WrittenArtifact>,
    pub latest: Vec<WrittenArtifact>,
}

impl PublishReport {
    pub fn all(&self) -> impl Iterator<Item = &WrittenArtifact> {
        self.snapshots.iter().chain(self.latest.iter())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("writing snapshot {file_name} failed: {source}")]
    Snapshot {
        file_name: String,
        source: PersistError,
    },
    #[error("updating {file_name} failed: {source}")]
    Latest {
        file_name: String,
        source: PersistError,
    },
}

pub struct PublishCoordinator<'a> {
    store: &'a dyn ArtifactStore,
}

impl<'a> PublishCoordinator<'a> {
    pub fn new(store: &'a dyn ArtifactStore) -> Self {
        Self { store }
    }

    /// Snapshots are written one by one; latest pointers are only touched once
    /// every snapshot is in place. All latest temp files are staged before the
    /// first rename, so a write failure leaves every latest file as it was.
    pub fn publish(
        &self,
        set: &PublishSet,
        sink: &dyn ProgressSink,
    ) -> Result<PublishReport, PublishError> {
        let mut report = PublishReport::default();

        for artifact in &set.snapshots {
            let written = self
                .store
                .stage(&artifact.file_name, &artifact.content)
                .and_then(|staged| self.store.commit(staged))
                .map_err(|source| {
                    engine_error!("snapshot {} not written: {}", artifact.file_name, source);
                    PublishError::Snapshot {
                        file_name: artifact.file_name.clone(),
                        source,
                    }
                })?;
            emit_written(sink, &written);
            report.snapshots.push(written);
        }

        let mut staged = Vec::with_capacity(set.latest.len());
        for artifact in &set.latest {
            let write = self
                .store
                .stage(&artifact.file_name, &artifact.content)
                .map_err(|source| {
                    engine_error!("{} not staged, latest left untouched: {}", artifact.file_name, source);
                    PublishError::Latest {
                        file_name: artifact.file_name.clone(),
                        source,
                    }
                })?;
            staged.push((artifact.file_name.as_str(), write));
        }

        for (file_name, write) in staged {
            let written = self.store.commit(write).map_err(|source| {
                engine_error!("{} not promoted: {}", file_name, source);
                PublishError::Latest {
                    file_name: file_name.to_string(),
                    source,
                }
            })?;
            emit_written(sink, &written);
            report.latest.push(written);
        }

        engine_debug!(
            "published {} snapshot(s) and {} latest pointer(s)",
            report.snapshots.len(),
            report.latest.len()
        );
        Ok(report)
    }
}

fn emit_written(sink: &dyn ProgressSink, written: &WrittenArtifact) {
    sink.emit(PipelineEvent::ArtifactWritten {
        path: written.path.clone(),
        status: written.status,
    });
}
