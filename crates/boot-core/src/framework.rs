//! Syncing framework files from the framework repository

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use boot_fs::checksum::digest_hex;
use boot_meta::{FrameworkConfig, FrameworkFile};
use serde::Serialize;

use crate::source::FileSource;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    UpToDate,
    /// Differs from the remote; left alone because of a dry run.
    WouldUpdate,
    Updated,
    /// Not present in the framework repository.
    Missing,
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpdateStatus::UpToDate => "up to date",
            UpdateStatus::WouldUpdate => "would update",
            UpdateStatus::Updated => "updated",
            UpdateStatus::Missing => "missing upstream",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileUpdate {
    /// Path relative to the project root, as configured.
    pub file: String,
    pub path: PathBuf,
    pub status: UpdateStatus,
}

/// Copies configured files from `framework.repo_url` into the project root.
pub struct FrameworkUpdater {
    root: PathBuf,
    config: FrameworkConfig,
    source: Arc<dyn FileSource>,
}

impl FrameworkUpdater {
    pub fn new(root: impl Into<PathBuf>, config: FrameworkConfig, source: Arc<dyn FileSource>) -> Self {
        Self {
            root: root.into(),
            config,
            source,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.repo_url().is_some()
    }

    fn repo_url(&self) -> Option<&str> {
        self.config
            .repo_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Bring one file in line with the framework repository.
    pub fn update_file(&self, file: &FrameworkFile, dry_run: bool) -> Result<FileUpdate> {
        let repo_url = self.repo_url().ok_or_else(not_configured)?;
        let path = self.root.join(&file.path);
        let update = |status| FileUpdate {
            file: file.path.clone(),
            path: path.clone(),
            status,
        };

        let Some(remote) = self.source.read_file(repo_url, &file.path)? else {
            tracing::warn!(file = %file.path, repo_url, "Framework file missing upstream");
            return Ok(update(UpdateStatus::Missing));
        };

        if let Some(local) = boot_fs::read_text_if_exists(&path)?
            && digest_hex(local.as_bytes()) == digest_hex(remote.as_bytes())
        {
            return Ok(update(UpdateStatus::UpToDate));
        }
        if dry_run {
            return Ok(update(UpdateStatus::WouldUpdate));
        }

        boot_fs::write_text(&path, &remote)?;
        if file.executable {
            boot_fs::io::set_executable(&path)?;
        }
        tracing::info!(file = %file.path, "Updated framework file");
        Ok(update(UpdateStatus::Updated))
    }

    /// Update every configured file. Stops at the first error.
    pub fn update_all(&self, dry_run: bool) -> Result<Vec<FileUpdate>> {
        if !self.is_configured() {
            return Err(not_configured());
        }
        self.config
            .files
            .iter()
            .map(|file| self.update_file(file, dry_run))
            .collect()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn not_configured() -> Error {
    Error::Config {
        message: "framework.repo_url is not set".to_string(),
    }
}
