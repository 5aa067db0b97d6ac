//! Cloud bucket backend driving the `gsutil` command line tool

use super::backend::FilestoreBackend;
use super::error::FilestoreResult;
use super::types::{BackendKind, CatOptions, CpOptions, LsOptions, RmOptions, RsyncOptions};
use crate::system::{CommandExecutor, ExecuteOptions, ProcessResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub const GSUTIL: &str = "gsutil";

/// Top level flag that makes gsutil run operations in parallel
pub const PARALLEL_FLAG: &str = "-m";

/// A gsutil subcommand together with the flags that shape its invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsutilCommand {
    pub arguments: Vec<String>,
    pub parallel: bool,
    pub expect_zero: bool,
}

impl GsutilCommand {
    pub fn argv(&self) -> Vec<String> {
        gsutil_command(&self.arguments, self.parallel)
    }
}

/// Full argument list for `gsutil [-m] <arguments>`
pub fn gsutil_command(arguments: &[String], parallel: bool) -> Vec<String> {
    let mut argv = Vec::with_capacity(arguments.len() + 2);
    argv.push(GSUTIL.to_string());
    if parallel {
        argv.push(PARALLEL_FLAG.to_string());
    }
    argv.extend(arguments.iter().cloned());
    argv
}

pub fn cp_command(source: &str, destination: &str, options: &CpOptions) -> GsutilCommand {
    let mut arguments = vec!["cp".to_string()];
    if options.recursive {
        arguments.push("-r".to_string());
    }
    arguments.push(source.to_string());
    arguments.push(destination.to_string());
    GsutilCommand {
        arguments,
        parallel: options.parallel,
        expect_zero: options.expect_zero,
    }
}

pub fn ls_command(path: &str, options: &LsOptions) -> GsutilCommand {
    GsutilCommand {
        arguments: vec!["ls".to_string(), path.to_string()],
        parallel: false,
        expect_zero: options.must_exist,
    }
}

pub fn rm_command(path: &str, options: &RmOptions) -> GsutilCommand {
    let mut arguments = vec!["rm".to_string()];
    if options.recursive {
        arguments.push("-r".to_string());
    }
    arguments.push(path.to_string());
    GsutilCommand {
        arguments,
        parallel: options.parallel,
        expect_zero: !options.force,
    }
}

pub fn rsync_command(source: &str, destination: &str, options: &RsyncOptions) -> GsutilCommand {
    let mut arguments = options.gsutil_options.clone();
    arguments.push("rsync".to_string());
    if options.delete {
        arguments.push("-d".to_string());
    }
    if options.recursive {
        arguments.push("-r".to_string());
    }
    arguments.extend(options.options.iter().cloned());
    arguments.push(source.to_string());
    arguments.push(destination.to_string());
    GsutilCommand {
        arguments,
        parallel: options.parallel,
        expect_zero: true,
    }
}

pub fn cat_command(path: &str, options: &CatOptions) -> GsutilCommand {
    GsutilCommand {
        arguments: vec!["cat".to_string(), path.to_string()],
        parallel: false,
        expect_zero: options.expect_zero,
    }
}

/// Filestore backed by a cloud bucket
pub struct GsutilFilestore {
    command_executor: Arc<dyn CommandExecutor>,
}

impl GsutilFilestore {
    pub fn new(command_executor: Arc<dyn CommandExecutor>) -> Self {
        Self { command_executor }
    }

    async fn run(&self, command: GsutilCommand) -> FilestoreResult<ProcessResult> {
        debug!(parallel = command.parallel, arguments = ?command.arguments, "gsutil");
        let result = self
            .command_executor
            .execute(&command.argv(), ExecuteOptions::expect_zero(command.expect_zero))
            .await?;
        Ok(result)
    }
}

#[async_trait]
impl FilestoreBackend for GsutilFilestore {
    fn kind(&self) -> BackendKind {
        BackendKind::Gsutil
    }

    async fn cp(
        &self,
        source: &str,
        destination: &str,
        options: &CpOptions,
    ) -> FilestoreResult<ProcessResult> {
        self.run(cp_command(source, destination, options)).await
    }

    async fn ls(&self, path: &str, options: &LsOptions) -> FilestoreResult<ProcessResult> {
        self.run(ls_command(path, options)).await
    }

    async fn rm(&self, path: &str, options: &RmOptions) -> FilestoreResult<ProcessResult> {
        self.run(rm_command(path, options)).await
    }

    async fn rsync(
        &self,
        source: &str,
        destination: &str,
        options: &RsyncOptions,
    ) -> FilestoreResult<ProcessResult> {
        self.run(rsync_command(source, destination, options)).await
    }

    async fn cat(&self, path: &str, options: &CatOptions) -> FilestoreResult<ProcessResult> {
        self.run(cat_command(path, options)).await
    }
}
