/// URL scheme of paths that live in a cloud bucket
pub const GCS_PREFIX: &str = "gs://";

/// Which backend services filestore operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Gsutil,
}

impl BackendKind {
    /// Backend able to address `path`: bucket URLs go to gsutil
    pub fn for_path(path: &str) -> Self {
        if path.starts_with(GCS_PREFIX) {
            BackendKind::Gsutil
        } else {
            BackendKind::Local
        }
    }

    /// Backend for the configured experiment filestore, local when unset
    pub fn from_filestore(filestore: Option<&str>) -> Self {
        filestore.map(Self::for_path).unwrap_or(BackendKind::Local)
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Gsutil => write!(f, "gsutil"),
        }
    }
}

/// Options for `cp`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpOptions {
    pub recursive: bool,
    pub parallel: bool,
    pub expect_zero: bool,
}

impl Default for CpOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            parallel: false,
            expect_zero: true,
        }
    }
}

/// Options for `ls`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsOptions {
    /// A missing path is an error rather than an empty listing
    pub must_exist: bool,
}

impl Default for LsOptions {
    fn default() -> Self {
        Self { must_exist: true }
    }
}

/// Options for `rm`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RmOptions {
    pub recursive: bool,
    /// Tolerate failures, e.g. removing a path that does not exist
    pub force: bool,
    pub parallel: bool,
}

/// Options for `rsync`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsyncOptions {
    /// Delete destination files missing from the source
    pub delete: bool,
    pub recursive: bool,
    /// Top level gsutil options placed before the `rsync` subcommand
    pub gsutil_options: Vec<String>,
    /// Extra options for the rsync subcommand itself
    pub options: Vec<String>,
    pub parallel: bool,
}

impl Default for RsyncOptions {
    fn default() -> Self {
        Self {
            delete: true,
            recursive: true,
            gsutil_options: Vec::new(),
            options: Vec::new(),
            parallel: false,
        }
    }
}

/// Options for `cat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatOptions {
    pub expect_zero: bool,
}

impl Default for CatOptions {
    fn default() -> Self {
        Self { expect_zero: true }
    }
}
