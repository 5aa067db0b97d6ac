//! Local filesystem backend driving coreutils and rsync

use super::backend::FilestoreBackend;
use super::error::{FilestoreError, FilestoreResult};
use super::types::{
    BackendKind, CatOptions, CpOptions, GCS_PREFIX, LsOptions, RmOptions, RsyncOptions,
};
use crate::system::{CommandExecutor, ExecuteOptions, FilesystemProbe, ProcessResult};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// A local command line. There is no parallel mode for local tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCommand {
    pub arguments: Vec<String>,
    pub expect_zero: bool,
}

fn local_filestore_command(arguments: Vec<String>, expect_zero: bool) -> LocalCommand {
    LocalCommand {
        arguments,
        expect_zero,
    }
}

pub fn cp_command(source: &str, destination: &str, options: &CpOptions) -> LocalCommand {
    let mut arguments = vec!["cp".to_string()];
    if options.recursive {
        arguments.push("-r".to_string());
    }
    arguments.push(source.to_string());
    arguments.push(destination.to_string());
    local_filestore_command(arguments, options.expect_zero)
}

pub fn ls_command(path: &str, options: &LsOptions) -> LocalCommand {
    local_filestore_command(vec!["ls".to_string(), path.to_string()], options.must_exist)
}

pub fn rm_command(path: &str, options: &RmOptions) -> LocalCommand {
    let mut arguments = vec!["rm".to_string()];
    if options.recursive {
        arguments.push("-r".to_string());
    }
    if options.force {
        arguments.push("-f".to_string());
    }
    arguments.push(path.to_string());
    local_filestore_command(arguments, !options.force)
}

/// `source` is passed through as given; see [`directory_contents`]
pub fn rsync_command(source: &str, destination: &str, options: &RsyncOptions) -> LocalCommand {
    let mut arguments = vec!["rsync".to_string()];
    if options.delete {
        arguments.push("--delete".to_string());
    }
    if options.recursive {
        arguments.push("-r".to_string());
    }
    arguments.extend(options.options.iter().cloned());
    arguments.push(source.to_string());
    arguments.push(destination.to_string());
    local_filestore_command(arguments, true)
}

pub fn cat_command(path: &str, options: &CatOptions) -> LocalCommand {
    local_filestore_command(vec!["cat".to_string(), path.to_string()], options.expect_zero)
}

/// rsync copies a directory's contents, not the directory, when it ends in `/`
pub fn directory_contents(dir: &str) -> String {
    format!("{}/", dir.trim_end_matches('/'))
}

/// Filestore backed by a directory on the local machine
pub struct LocalFilestore {
    command_executor: Arc<dyn CommandExecutor>,
    filesystem: Arc<dyn FilesystemProbe>,
}

impl LocalFilestore {
    pub fn new(
        command_executor: Arc<dyn CommandExecutor>,
        filesystem: Arc<dyn FilesystemProbe>,
    ) -> Self {
        Self {
            command_executor,
            filesystem,
        }
    }

    fn ensure_local(&self, path: &str) -> FilestoreResult<()> {
        if path.starts_with(GCS_PREFIX) {
            return Err(FilestoreError::unsupported_path(BackendKind::Local, path));
        }
        Ok(())
    }

    async fn run(&self, command: LocalCommand) -> FilestoreResult<ProcessResult> {
        debug!(arguments = ?command.arguments, "local filestore");
        let result = self
            .command_executor
            .execute(
                &command.arguments,
                ExecuteOptions::expect_zero(command.expect_zero),
            )
            .await?;
        Ok(result)
    }
}

#[async_trait]
impl FilestoreBackend for LocalFilestore {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn cp(
        &self,
        source: &str,
        destination: &str,
        options: &CpOptions,
    ) -> FilestoreResult<ProcessResult> {
        self.ensure_local(source)?;
        self.ensure_local(destination)?;
        if let Some(parent) = Path::new(destination).parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = self.filesystem.create_dir_all(parent) {
                    let path = parent.to_string_lossy();
                    if options.expect_zero {
                        return Err(FilestoreError::local_io(&path, e));
                    }
                    // cp reports the real failure; its exit status is tolerated too
                    warn!(path = %path, error = %e, "Could not create destination parent");
                }
            }
        }
        self.run(cp_command(source, destination, options)).await
    }

    async fn ls(&self, path: &str, options: &LsOptions) -> FilestoreResult<ProcessResult> {
        self.ensure_local(path)?;
        self.run(ls_command(path, options)).await
    }

    async fn rm(&self, path: &str, options: &RmOptions) -> FilestoreResult<ProcessResult> {
        self.ensure_local(path)?;
        self.run(rm_command(path, options)).await
    }

    async fn rsync(
        &self,
        source: &str,
        destination: &str,
        options: &RsyncOptions,
    ) -> FilestoreResult<ProcessResult> {
        self.ensure_local(source)?;
        self.ensure_local(destination)?;
        let source = if self.filesystem.is_dir(Path::new(source)) {
            directory_contents(source)
        } else {
            source.to_string()
        };
        self.run(rsync_command(&source, destination, options)).await
    }

    async fn cat(&self, path: &str, options: &CatOptions) -> FilestoreResult<ProcessResult> {
        self.ensure_local(path)?;
        self.run(cat_command(path, options)).await
    }
}
