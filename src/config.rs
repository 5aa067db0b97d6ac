//! Backend selection and executor wiring for the process

use crate::filestore::{BackendKind, Filestore};
use crate::system::{
    CommandExecutor, DryRunCommandExecutor, DryRunFilesystemProbe, FilesystemProbe,
    RealCommandExecutor, RealFilesystemProbe,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the experiment filestore
pub const FILESTORE_ENV: &str = "EXPERIMENT_FILESTORE";

/// Environment variable enabling dry runs
pub const DRY_RUN_ENV: &str = "FILESTORE_DRY_RUN";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Experiment filestore path is empty. Set {} or pass --filestore", FILESTORE_ENV)]
    EmptyFilestore,

    #[error("The {backend} backend cannot serve filestore {filestore}")]
    BackendMismatch {
        backend: BackendKind,
        filestore: String,
    },
}

/// Process wide filestore settings, resolved once at startup
#[derive(Debug, Clone, Default)]
pub struct FilestoreConfig {
    /// Root of the experiment filestore, a directory or a `gs://` bucket
    pub filestore: Option<String>,
    /// Explicit backend, otherwise derived from `filestore`
    pub backend: Option<BackendKind>,
    /// Print commands instead of running them
    pub dry_run: bool,
}

impl FilestoreConfig {
    pub fn backend_kind(&self) -> Result<BackendKind, ConfigError> {
        let filestore = match self.filestore.as_deref() {
            Some(path) if path.trim().is_empty() => return Err(ConfigError::EmptyFilestore),
            other => other,
        };
        let detected = BackendKind::from_filestore(filestore);

        match self.backend {
            None => Ok(detected),
            Some(BackendKind::Local) if detected == BackendKind::Gsutil => {
                Err(ConfigError::BackendMismatch {
                    backend: BackendKind::Local,
                    filestore: filestore.unwrap_or_default().to_string(),
                })
            }
            Some(kind) => Ok(kind),
        }
    }

    /// Build the dispatcher with real or dry-run system access
    pub fn build(&self) -> Result<Filestore, ConfigError> {
        let kind = self.backend_kind()?;
        let (executor, filesystem): (Arc<dyn CommandExecutor>, Arc<dyn FilesystemProbe>) =
            if self.dry_run {
                (Arc::new(DryRunCommandExecutor), Arc::new(DryRunFilesystemProbe))
            } else {
                (Arc::new(RealCommandExecutor), Arc::new(RealFilesystemProbe))
            };
        debug!(backend = %kind, dry_run = self.dry_run, "Filestore configured");
        Ok(Filestore::new(kind, executor, filesystem))
    }
}
