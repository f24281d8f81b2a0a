//! Error types for boot-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] boot_fs::Error),

    #[error("Malformed manifest: {message}")]
    ManifestParse { message: String },

    #[error("Invalid manifest: {reason}")]
    InvalidManifest { reason: String },

    #[error("Project manifest not found at {path}")]
    ProjectManifestNotFound { path: PathBuf },

    #[error("Invalid configuration at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Invalid configuration: {message}")]
    Validation { message: String },

    #[error("Invalid module type '{name}': {reason}")]
    InvalidModuleType { name: String, reason: String },
}
