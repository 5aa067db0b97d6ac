use super::error::FilestoreResult;
use super::types::{BackendKind, CatOptions, CpOptions, LsOptions, RmOptions, RsyncOptions};
use crate::system::ProcessResult;
use async_trait::async_trait;

/// The operation set every filestore backend provides
#[async_trait]
pub trait FilestoreBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn cp(
        &self,
        source: &str,
        destination: &str,
        options: &CpOptions,
    ) -> FilestoreResult<ProcessResult>;

    async fn ls(&self, path: &str, options: &LsOptions) -> FilestoreResult<ProcessResult>;

    async fn rm(&self, path: &str, options: &RmOptions) -> FilestoreResult<ProcessResult>;

    async fn rsync(
        &self,
        source: &str,
        destination: &str,
        options: &RsyncOptions,
    ) -> FilestoreResult<ProcessResult>;

    async fn cat(&self, path: &str, options: &CatOptions) -> FilestoreResult<ProcessResult>;
}
