//! Staging-mirror git client
//!
//! Each reference is fetched once per run into a bare mirror inside a
//! temporary staging directory. Manifest reads come straight out of the
//! mirror's `HEAD` tree, and materializing a module is a local clone from
//! the mirror, so a module costs one network fetch no matter how many
//! times it is inspected.

use std::path::{Path, PathBuf};

use boot_fs::checksum;
use git2::build::RepoBuilder;
use git2::{ErrorCode, Repository};
use tempfile::TempDir;

use crate::{Error, RepoAddress, Result};

/// Git client backed by a per-run staging area.
///
/// The staging directory is removed when the client is dropped.
#[derive(Debug)]
pub struct GitRemote {
    staging: TempDir,
}

impl GitRemote {
    /// Create a client staging mirrors under the system temp directory.
    pub fn new() -> Result<Self> {
        let staging = tempfile::Builder::new()
            .prefix("boot-staging-")
            .tempdir()
            .map_err(|e| boot_fs::Error::io(std::env::temp_dir(), e))?;
        Ok(Self { staging })
    }

    /// Create a client staging mirrors under `parent`.
    pub fn in_dir(parent: &Path) -> Result<Self> {
        boot_fs::ensure_dir(parent)?;
        let staging = tempfile::Builder::new()
            .prefix("boot-staging-")
            .tempdir_in(parent)
            .map_err(|e| boot_fs::Error::io(parent, e))?;
        Ok(Self { staging })
    }

    pub fn staging_dir(&self) -> &Path {
        self.staging.path()
    }

    /// Mirror path for an address.
    ///
    /// Keyed by the reference rather than the clone URL: two spellings of
    /// the same repository get separate mirrors and never race on one path.
    fn mirror_path(&self, address: &RepoAddress) -> PathBuf {
        self.staging
            .path()
            .join(checksum::short_key(address.reference()))
    }

    /// Open the bare mirror for `address`, fetching it on first use.
    pub fn mirror(&self, address: &RepoAddress) -> Result<Repository> {
        let path = self.mirror_path(address);
        if path.exists() {
            return Ok(Repository::open_bare(&path)?);
        }

        tracing::debug!(url = %address.clone_url(), path = %path.display(), "Fetching mirror");
        RepoBuilder::new()
            .bare(true)
            .clone(address.clone_url(), &path)
            .map_err(|e| Error::CloneFailed {
                url: address.clone_url().to_string(),
                message: e.message().to_string(),
            })
    }

    /// Read a file from the default branch of `address`.
    ///
    /// Returns `None` when the repository has no commits or the file is
    /// absent.
    pub fn read_file(&self, address: &RepoAddress, file: &str) -> Result<Option<String>> {
        let repo = self.mirror(address)?;

        let head = match repo.head() {
            Ok(head) => head,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let tree = head.peel_to_tree()?;

        let entry = match tree.get_path(Path::new(file)) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let object = entry.to_object(&repo)?;
        let Some(blob) = object.as_blob() else {
            return Ok(None);
        };

        String::from_utf8(blob.content().to_vec())
            .map(Some)
            .map_err(|_| Error::NotUtf8 {
                url: address.clone_url().to_string(),
                file: file.to_string(),
            })
    }

    /// Check out `address` into `dest`.
    ///
    /// `dest` must be absent or an empty directory. The clone is made from
    /// the staging mirror and its `origin` is then pointed at the real
    /// remote.
    pub fn clone_into(&self, address: &RepoAddress, dest: &Path) -> Result<()> {
        let mirror = self.mirror(address)?;
        let source = mirror.path().to_string_lossy().into_owned();

        tracing::debug!(url = %address.clone_url(), dest = %dest.display(), "Cloning from mirror");
        let repo = RepoBuilder::new()
            .clone(&source, dest)
            .map_err(|e| Error::CloneFailed {
                url: address.clone_url().to_string(),
                message: e.message().to_string(),
            })?;
        repo.remote_set_url("origin", address.clone_url())?;

        Ok(())
    }
}
