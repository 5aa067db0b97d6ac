//! Filestore operations over a local directory or a cloud bucket

pub mod backend;
pub mod dispatcher;
pub mod error;
pub mod gsutil;
pub mod local;
pub mod types;

// Re-export commonly used items
pub use dispatcher::Filestore;
pub use error::FilestoreResult;
pub use types::{BackendKind, CatOptions, CpOptions, LsOptions, RmOptions, RsyncOptions};
