use super::backend::FilestoreBackend;
use super::error::FilestoreResult;
use super::gsutil::GsutilFilestore;
use super::local::LocalFilestore;
use super::types::{BackendKind, CatOptions, CpOptions, LsOptions, RmOptions, RsyncOptions};
use crate::system::{CommandExecutor, FilesystemProbe, ProcessResult};
use std::sync::Arc;
use tracing::debug;

/// Routes filestore operations to the backend selected at startup
pub struct Filestore {
    backend: Box<dyn FilestoreBackend>,
}

impl Filestore {
    pub fn new(
        kind: BackendKind,
        command_executor: Arc<dyn CommandExecutor>,
        filesystem: Arc<dyn FilesystemProbe>,
    ) -> Self {
        let backend: Box<dyn FilestoreBackend> = match kind {
            BackendKind::Local => Box::new(LocalFilestore::new(command_executor, filesystem)),
            BackendKind::Gsutil => Box::new(GsutilFilestore::new(command_executor)),
        };
        Self::with_backend(backend)
    }

    pub fn with_backend(backend: Box<dyn FilestoreBackend>) -> Self {
        Self { backend }
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub async fn cp(
        &self,
        source: &str,
        destination: &str,
        options: CpOptions,
    ) -> FilestoreResult<ProcessResult> {
        debug!(backend = %self.kind(), source, destination, ?options, "cp");
        self.backend.cp(source, destination, &options).await
    }

    pub async fn ls(&self, path: &str, options: LsOptions) -> FilestoreResult<ProcessResult> {
        debug!(backend = %self.kind(), path, ?options, "ls");
        self.backend.ls(path, &options).await
    }

    pub async fn rm(&self, path: &str, options: RmOptions) -> FilestoreResult<ProcessResult> {
        debug!(backend = %self.kind(), path, ?options, "rm");
        self.backend.rm(path, &options).await
    }

    pub async fn rsync(
        &self,
        source: &str,
        destination: &str,
        options: RsyncOptions,
    ) -> FilestoreResult<ProcessResult> {
        debug!(backend = %self.kind(), source, destination, ?options, "rsync");
        self.backend.rsync(source, destination, &options).await
    }

    pub async fn cat(&self, path: &str, options: CatOptions) -> FilestoreResult<ProcessResult> {
        debug!(backend = %self.kind(), path, ?options, "cat");
        self.backend.cat(path, &options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filestore::gsutil;
    use crate::filestore::local;
    use crate::system::commands::testing::RecordingCommandExecutor;
    use crate::system::filesystem::testing::FakeFilesystem;

    fn filestore_for(
        filestore_path: &str,
        fs: FakeFilesystem,
    ) -> (Filestore, Arc<RecordingCommandExecutor>) {
        let executor = Arc::new(RecordingCommandExecutor::new());
        let kind = BackendKind::from_filestore(Some(filestore_path));
        let filestore = Filestore::new(kind, executor.clone(), Arc::new(fs));
        (filestore, executor)
    }

    mod local_filestore {
        use super::*;

        const FILESTORE: &str = "/experiment_data";
        const DIR1: &str = "/dir1";
        const DIR2: &str = "/dir2";

        #[tokio::test]
        async fn test_local_filestore_on() {
            let (filestore, executor) = filestore_for(FILESTORE, FakeFilesystem::new());
            assert_eq!(filestore.kind(), BackendKind::Local);

            filestore
                .cp(DIR1, DIR2, CpOptions {
                    recursive: true,
                    ..Default::default()
                })
                .await
                .unwrap();

            executor.assert_called_with(&["cp", "-r", DIR1, DIR2], true);
        }

        #[tokio::test]
        async fn test_local_filestore_parallel_off() {
            let (filestore, executor) =
                filestore_for(FILESTORE, FakeFilesystem::new().with_dir(DIR1));

            filestore
                .rsync(DIR1, DIR2, RsyncOptions {
                    parallel: true,
                    ..Default::default()
                })
                .await
                .unwrap();

            let calls = executor.calls();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].argv[0], "rsync");
            assert!(!calls[0].argv.iter().any(|a| a == gsutil::PARALLEL_FLAG));
            assert_eq!(
                calls[0].argv,
                vec!["rsync", "--delete", "-r", "/dir1/", DIR2]
            );
        }

        #[test]
        fn test_local_command_builder_drops_parallel() {
            let command = local::cp_command(DIR1, DIR2, &CpOptions {
                parallel: true,
                ..Default::default()
            });
            assert_eq!(command.arguments, vec!["cp", DIR1, DIR2]);
        }
    }

    mod gsutil_filestore {
        use super::*;

        const FILESTORE: &str = "gs://experiment-data";
        const LOCAL_DIR: &str = "/dir";
        const GSUTIL_DIR: &str = "gs://fake_dir";

        #[tokio::test]
        async fn test_gsutil_on() {
            let (filestore, executor) =
                filestore_for(FILESTORE, FakeFilesystem::new().with_dir(LOCAL_DIR));
            assert_eq!(filestore.kind(), BackendKind::Gsutil);

            filestore
                .cp(LOCAL_DIR, GSUTIL_DIR, CpOptions {
                    recursive: true,
                    ..Default::default()
                })
                .await
                .unwrap();

            executor.assert_called_with(&["gsutil", "cp", "-r", LOCAL_DIR, GSUTIL_DIR], true);
        }

        #[tokio::test]
        async fn test_keyword_args() {
            let (filestore, executor) = filestore_for(FILESTORE, FakeFilesystem::new());

            filestore
                .rm(FILESTORE, RmOptions {
                    recursive: true,
                    parallel: true,
                    ..Default::default()
                })
                .await
                .unwrap();
            executor.assert_called_with(&["gsutil", "-m", "rm", "-r", FILESTORE], true);

            executor.push_result(ProcessResult::new(0, "", ""));
            filestore.ls(FILESTORE, LsOptions::default()).await.unwrap();
            executor.assert_called_with(&["gsutil", "ls", FILESTORE], true);

            filestore
                .cp(GSUTIL_DIR, FILESTORE, CpOptions {
                    parallel: true,
                    ..Default::default()
                })
                .await
                .unwrap();
            executor.assert_called_with(&["gsutil", "-m", "cp", GSUTIL_DIR, FILESTORE], true);
        }

        #[tokio::test]
        async fn test_gsutil_parallel_on() {
            let options = RsyncOptions {
                parallel: true,
                ..Default::default()
            };
            let command = gsutil::rsync_command(GSUTIL_DIR, FILESTORE, &options);
            assert!(command.parallel);

            let (filestore, executor) = filestore_for(FILESTORE, FakeFilesystem::new());
            filestore.rsync(GSUTIL_DIR, FILESTORE, options).await.unwrap();
            executor.assert_called_with(
                &["gsutil", "-m", "rsync", "-d", "-r", GSUTIL_DIR, FILESTORE],
                true,
            );
        }

        #[tokio::test]
        async fn test_ls_lists_bucket_entries() {
            let (filestore, executor) = filestore_for(FILESTORE, FakeFilesystem::new());
            executor.push_result(ProcessResult::new(
                0,
                "gs://experiment-data/a\ngs://experiment-data/b\n",
                "",
            ));

            let result = filestore.ls(FILESTORE, LsOptions::default()).await.unwrap();

            let entries: Vec<&str> = result.lines().collect();
            assert_eq!(entries, vec!["gs://experiment-data/a", "gs://experiment-data/b"]);
        }

        #[tokio::test]
        async fn test_failed_command_surfaces_exit_code() {
            let (filestore, executor) = filestore_for(FILESTORE, FakeFilesystem::new());
            executor.push_result(ProcessResult::new(
                1,
                "",
                "CommandException: One or more URLs matched no objects.",
            ));

            let err = filestore
                .ls("gs://experiment-data/missing", LsOptions::default())
                .await
                .unwrap_err();
            assert_eq!(err.retcode(), Some(1));

            executor.push_result(ProcessResult::new(1, "", ""));
            let result = filestore
                .ls("gs://experiment-data/missing", LsOptions { must_exist: false })
                .await
                .unwrap();
            assert_eq!(result.retcode, 1);
            assert_eq!(result.lines().count(), 0);
        }

        #[tokio::test]
        async fn test_forced_rm_ignores_failure() {
            let (filestore, executor) = filestore_for(FILESTORE, FakeFilesystem::new());
            executor.push_result(ProcessResult::new(1, "", "No URLs matched"));

            let result = filestore
                .rm("gs://experiment-data/gone", RmOptions {
                    force: true,
                    ..Default::default()
                })
                .await
                .unwrap();

            assert_eq!(result.retcode, 1);
            executor.assert_called_with(&["gsutil", "rm", "gs://experiment-data/gone"], false);
        }
    }
}
