//! Collaborator traits the resolver drives
//!
//! Implementations are called from blocking worker threads, so they are
//! plain synchronous traits and must be `Send + Sync`.

use std::path::Path;
use std::sync::Arc;

use boot_git::RepoIdentity;
use boot_meta::ModuleManifest;

use crate::error::InstallError;
use crate::{ModuleReference, Result};

/// Yields a module's parsed manifest.
pub trait ManifestSource: Send + Sync {
    /// `Ok(None)` when the module has no manifest.
    fn get_manifest(&self, reference: &ModuleReference) -> Result<Option<ModuleManifest>>;
}

/// Places a module's content on disk.
pub trait FetchExecutor: Send + Sync {
    /// Owner/name identity used for naming and canonical URL synthesis.
    fn identity(&self, reference: &ModuleReference) -> Result<RepoIdentity>;

    /// Write the module's content into `destination`, which exists and is
    /// empty.
    fn materialize(&self, reference: &ModuleReference, destination: &Path) -> Result<()>;
}

/// Best-effort local installation of a freshly fetched module.
pub trait Installer: Send + Sync {
    fn install(&self, destination: &Path) -> std::result::Result<(), InstallError>;
}

/// Reads single files from a remote repository.
pub trait FileSource: Send + Sync {
    /// `Ok(None)` when the file does not exist.
    fn read_file(&self, repo_url: &str, path: &str) -> Result<Option<String>>;
}

/// Installer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInstaller;

impl Installer for NoopInstaller {
    fn install(&self, _destination: &Path) -> std::result::Result<(), InstallError> {
        Ok(())
    }
}

/// The collaborators one resolution run uses.
#[derive(Clone)]
pub struct ModuleSources {
    pub manifests: Arc<dyn ManifestSource>,
    pub fetcher: Arc<dyn FetchExecutor>,
    pub installer: Arc<dyn Installer>,
}

impl ModuleSources {
    pub fn new(
        manifests: Arc<dyn ManifestSource>,
        fetcher: Arc<dyn FetchExecutor>,
        installer: Arc<dyn Installer>,
    ) -> Self {
        Self {
            manifests,
            fetcher,
            installer,
        }
    }

    /// One value serving as both manifest source and fetch executor.
    pub fn from_source<S>(source: Arc<S>, installer: Arc<dyn Installer>) -> Self
    where
        S: ManifestSource + FetchExecutor + 'static,
    {
        Self {
            manifests: source.clone(),
            fetcher: source,
            installer,
        }
    }
}

impl std::fmt::Debug for ModuleSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleSources").finish_non_exhaustive()
    }
}
