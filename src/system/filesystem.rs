use std::io;
use std::path::Path;

/// Abstraction for local filesystem checks to enable testing without real files
pub trait FilesystemProbe: Send + Sync {
    fn is_dir(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Real filesystem probe using std::fs
pub struct RealFilesystemProbe;

impl FilesystemProbe for RealFilesystemProbe {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Probe that reads the real filesystem but never modifies it
pub struct DryRunFilesystemProbe;

impl FilesystemProbe for DryRunFilesystemProbe {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        tracing::info!(path = %path.display(), "Dry run, not creating directory");
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// In-memory directory tree; only directories are tracked
    #[derive(Default)]
    pub struct FakeFilesystem {
        dirs: Mutex<HashSet<PathBuf>>,
    }

    impl FakeFilesystem {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dir(self, path: &str) -> Self {
            self.add_dir(Path::new(path));
            self
        }

        fn add_dir(&self, path: &Path) {
            let mut dirs = self.dirs.lock().unwrap();
            for ancestor in path.ancestors() {
                if !ancestor.as_os_str().is_empty() {
                    dirs.insert(ancestor.to_path_buf());
                }
            }
        }
    }

    impl FilesystemProbe for FakeFilesystem {
        fn is_dir(&self, path: &Path) -> bool {
            self.dirs.lock().unwrap().contains(path)
        }

        fn create_dir_all(&self, path: &Path) -> io::Result<()> {
            self.add_dir(path);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeFilesystem;
    use super::*;

    #[test]
    fn test_real_probe_creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b/c");

        assert!(!RealFilesystemProbe.is_dir(&nested));
        RealFilesystemProbe.create_dir_all(&nested).unwrap();
        assert!(RealFilesystemProbe.is_dir(&nested));
        // Idempotent
        RealFilesystemProbe.create_dir_all(&nested).unwrap();
    }

    #[test]
    fn test_real_probe_file_is_not_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("data.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(!RealFilesystemProbe.is_dir(&file));
    }

    #[test]
    fn test_dry_run_probe_does_not_create() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("never");
        DryRunFilesystemProbe.create_dir_all(&nested).unwrap();
        assert!(!nested.exists());
        assert!(DryRunFilesystemProbe.is_dir(tmp.path()));
    }

    #[test]
    fn test_fake_filesystem_tracks_ancestors() {
        let fs = FakeFilesystem::new().with_dir("/dir1/sub");
        assert!(fs.is_dir(Path::new("/dir1")));
        assert!(fs.is_dir(Path::new("/dir1/sub")));
        assert!(!fs.is_dir(Path::new("/dir2")));
    }
}
