//! Error types for boot-git

/// Result type for boot-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in boot-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] boot_fs::Error),

    #[error("Invalid repository address '{reference}': {reason}")]
    InvalidAddress { reference: String, reason: String },

    #[error("Failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    #[error("File '{file}' in {url} is not valid UTF-8")]
    NotUtf8 { url: String, file: String },
}
