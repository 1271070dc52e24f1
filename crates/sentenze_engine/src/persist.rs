use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// New bytes were renamed into place.
    Written,
    /// The final file already held identical bytes and was left alone.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    pub path: PathBuf,
    pub status: WriteStatus,
}

/// Content fully written and synced to a temporary sibling, waiting to be
/// renamed over its final name.
#[derive(Debug)]
pub struct StagedWrite {
    target: PathBuf,
    tmp: Option<NamedTempFile>,
}

impl StagedWrite {
    pub fn target(&self) -> &Path {
        &self.target
    }
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Writable only if a temp file can be created there.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then
/// renaming. A reader sees either the old file or the new one, never a mix.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// First half of a write: the temp file is complete and synced, the final
    /// name is untouched. Dropping the result removes the temp file.
    pub fn stage(&self, filename: &str, content: &[u8]) -> Result<StagedWrite, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        if matches!(fs::read(&target), Ok(existing) if existing == content) {
            return Ok(StagedWrite { target, tmp: None });
        }

        let mut tmp = new_temp_sibling(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        Ok(StagedWrite {
            target,
            tmp: Some(tmp),
        })
    }

    /// Second half: rename the temp file over the final name.
    pub fn commit(&self, staged: StagedWrite) -> Result<WrittenArtifact, PersistError> {
        let StagedWrite { target, tmp } = staged;
        match tmp {
            None => Ok(WrittenArtifact {
                path: target,
                status: WriteStatus::Unchanged,
            }),
            Some(tmp) => {
                tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
                Ok(WrittenArtifact {
                    path: target,
                    status: WriteStatus::Written,
                })
            }
        }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<WrittenArtifact, PersistError> {
        let staged = self.stage(filename, content)?;
        self.commit(staged)
    }
}

/// Hidden `.sentenze-*.tmp` sibling, world-readable like a normal published file.
fn new_temp_sibling(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".sentenze-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }
    builder.tempfile_in(dir)
}
