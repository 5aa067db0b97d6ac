use crate::system::ExecutionError;
use thiserror::Error;

/// Errors that can occur while running a filestore operation
#[derive(Debug, Error)]
pub enum FilestoreError {
    /// The underlying command could not run or exited unsuccessfully
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Preparing a local path before running the command failed
    #[error("Failed to prepare local path {path}: {source}")]
    LocalIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The selected backend cannot address this path
    #[error("{backend} filestore cannot handle path {path}")]
    UnsupportedPath { backend: String, path: String },
}

impl FilestoreError {
    pub fn local_io(path: &str, source: std::io::Error) -> Self {
        FilestoreError::LocalIo {
            path: path.to_string(),
            source,
        }
    }

    pub fn unsupported_path(backend: impl ToString, path: &str) -> Self {
        FilestoreError::UnsupportedPath {
            backend: backend.to_string(),
            path: path.to_string(),
        }
    }

    /// Exit code of the failed tool, when the failure came from one
    pub fn retcode(&self) -> Option<i32> {
        match self {
            FilestoreError::Execution(ExecutionError::NonZeroExit { retcode, .. }) => {
                Some(*retcode)
            }
            _ => None,
        }
    }
}

/// Result type alias for filestore operations
pub type FilestoreResult<T> = Result<T, FilestoreError>;
