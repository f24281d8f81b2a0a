//! Error types for boot-core
//!
//! [`Error`] aborts a run before any module is dispatched. [`ModuleError`]
//! is scoped to one module: it is logged, collected and the run goes on.
//! [`InstallError`] and [`InitializerError`] never fail a module at all.

use std::fmt;
use std::path::PathBuf;

/// Result type for boot-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Run-level errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Project manifest not found at {path}")]
    ProjectManifestNotFound { path: PathBuf },

    #[error("Invalid worker count {count}: at least one worker is required")]
    InvalidWorkerCount { count: usize },

    #[error("A virtual environment is required but VIRTUAL_ENV is not set")]
    VirtualEnvRequired,

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Failure reported by a manifest, fetch or file source implementation
    #[error("{message}")]
    Source { message: String },

    // Transparent wrappers for underlying crate errors
    #[error(transparent)]
    Fs(#[from] boot_fs::Error),

    #[error(transparent)]
    Git(#[from] boot_git::Error),

    #[error(transparent)]
    Meta(#[from] boot_meta::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn source_failure(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }
}

/// Why a single module could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleErrorKind {
    Manifest,
    UnknownType,
    Fetch,
    Task,
}

impl fmt::Display for ModuleErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ModuleErrorKind::Manifest => "manifest",
            ModuleErrorKind::UnknownType => "unknown type",
            ModuleErrorKind::Fetch => "fetch",
            ModuleErrorKind::Task => "task",
        };
        f.write_str(label)
    }
}

/// A per-module failure. The module is marked processed and never retried
/// within the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    #[error("Cannot read manifest for '{reference}': {reason}")]
    Manifest { reference: String, reason: String },

    #[error("Unknown module type '{module_type}' declared by '{reference}'")]
    UnknownType {
        reference: String,
        module_type: String,
    },

    #[error("Failed to fetch '{reference}': {message}")]
    Fetch { reference: String, message: String },

    #[error("Fetch task for '{reference}' did not complete: {message}")]
    Task { reference: String, message: String },
}

impl ModuleError {
    pub fn kind(&self) -> ModuleErrorKind {
        match self {
            ModuleError::Manifest { .. } => ModuleErrorKind::Manifest,
            ModuleError::UnknownType { .. } => ModuleErrorKind::UnknownType,
            ModuleError::Fetch { .. } => ModuleErrorKind::Fetch,
            ModuleError::Task { .. } => ModuleErrorKind::Task,
        }
    }

    /// The reference of the module that failed.
    pub fn reference(&self) -> &str {
        match self {
            ModuleError::Manifest { reference, .. }
            | ModuleError::UnknownType { reference, .. }
            | ModuleError::Fetch { reference, .. }
            | ModuleError::Task { reference, .. } => reference,
        }
    }
}

/// Installing a module's own dependencies failed.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Installing {path} exited with {status}: {stderr}")]
    Failed {
        path: PathBuf,
        status: String,
        stderr: String,
    },
}

/// A module's initializer script could not run or exited unsuccessfully.
#[derive(Debug, thiserror::Error)]
pub enum InitializerError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Initializer {path} exited with {status}: {stderr}")]
    Failed {
        path: PathBuf,
        status: String,
        stderr: String,
    },
}
