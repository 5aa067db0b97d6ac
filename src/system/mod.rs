//! System interface abstractions for testing and development

pub mod commands;
pub mod filesystem;

// Re-export commonly used items
pub use commands::{
    CommandExecutor, DryRunCommandExecutor, ExecuteOptions, ExecutionError, ProcessResult,
    RealCommandExecutor,
};
pub use filesystem::{DryRunFilesystemProbe, FilesystemProbe, RealFilesystemProbe};
