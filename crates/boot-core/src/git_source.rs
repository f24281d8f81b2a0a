//! Git-backed manifest source, fetch executor and file reader

use std::path::Path;

use boot_git::{GitRemote, RepoAddress, RepoIdentity};
use boot_meta::{BootConfig, ModuleManifest};

use crate::source::{FetchExecutor, FileSource, ManifestSource};
use crate::{ModuleReference, Result};

/// Resolves module references through [`GitRemote`].
///
/// All lookups for a reference share one staging mirror, so reading the
/// manifest and cloning the module fetch from the network once.
#[derive(Debug)]
pub struct GitModuleSource {
    remote: GitRemote,
    manifest_file: String,
    default_host: String,
}

impl GitModuleSource {
    pub fn new(remote: GitRemote, manifest_file: impl Into<String>, default_host: impl Into<String>) -> Self {
        Self {
            remote,
            manifest_file: manifest_file.into(),
            default_host: default_host.into(),
        }
    }

    /// Source with a fresh staging area, configured from `config`.
    pub fn from_config(config: &BootConfig) -> Result<Self> {
        let remote = GitRemote::new()?;
        Ok(Self::new(remote, &config.manifest_file, &config.default_host))
    }

    fn address(&self, reference: &str) -> Result<RepoAddress> {
        Ok(RepoAddress::parse(reference, &self.default_host)?)
    }
}

impl ManifestSource for GitModuleSource {
    fn get_manifest(&self, reference: &ModuleReference) -> Result<Option<ModuleManifest>> {
        let address = self.address(reference.as_str())?;
        let Some(content) = self.remote.read_file(&address, &self.manifest_file)? else {
            return Ok(None);
        };
        Ok(Some(ModuleManifest::from_yaml(&content)?))
    }
}

impl FetchExecutor for GitModuleSource {
    fn identity(&self, reference: &ModuleReference) -> Result<RepoIdentity> {
        Ok(self.address(reference.as_str())?.identity())
    }

    fn materialize(&self, reference: &ModuleReference, destination: &Path) -> Result<()> {
        let address = self.address(reference.as_str())?;
        self.remote.clone_into(&address, destination)?;
        Ok(())
    }
}

impl FileSource for GitModuleSource {
    fn read_file(&self, repo_url: &str, path: &str) -> Result<Option<String>> {
        let address = self.address(repo_url)?;
        Ok(self.remote.read_file(&address, path)?)
    }
}
