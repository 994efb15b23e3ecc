use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("path does not exist or is not a file: {0}")]
    NotAFile(PathBuf),
    #[error("path has no file name: {0}")]
    NoFileName(PathBuf),
    #[error("failed to stage {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Process-private directory that log files are copied into before parsing
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    /// Create `<base>/soc-ingest-<uuid>`
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self, StagingError> {
        let dir = base_path
            .as_ref()
            .join(format!("soc-ingest-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).map_err(|source| StagingError::Io {
            path: dir.clone(),
            source,
        })?;
        debug!("Created staging directory {}", dir.display());
        Ok(Self { dir })
    }

    /// Staging area under the system temp directory
    pub fn in_temp_dir() -> Result<Self, StagingError> {
        Self::new(std::env::temp_dir())
    }

    #[cfg(test)]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `source` into the staging directory under the same file name
    pub fn stage(&self, source: impl AsRef<Path>) -> Result<PathBuf, StagingError> {
        let source = source.as_ref();
        if !source.is_file() {
            return Err(StagingError::NotAFile(source.to_path_buf()));
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| StagingError::NoFileName(source.to_path_buf()))?;
        let staged = self.dir.join(file_name);

        fs::copy(source, &staged).map_err(|e| StagingError::Io {
            path: source.to_path_buf(),
            source: e,
        })?;

        info!("Log copied to staging area: {}", staged.display());
        Ok(staged)
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.dir) {
            warn!("Failed to remove staging directory {}: {}", self.dir.display(), e);
        }
    }
}
