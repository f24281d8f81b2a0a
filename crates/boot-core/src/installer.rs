//! `pip install -r requirements.txt` for modules and the project root

use std::path::{Path, PathBuf};
use std::process::Command;

use boot_meta::InstallerConfig;

use crate::error::InstallError;
use crate::report::ModulesReport;
use crate::source::Installer;

/// Installs a directory's Python requirements with `<python> -m pip`.
#[derive(Debug, Clone)]
pub struct RequirementsInstaller {
    config: InstallerConfig,
}

/// Outcome of [`RequirementsInstaller::install_all`].
#[derive(Debug, Default)]
pub struct InstallSummary {
    pub installed: Vec<PathBuf>,
    /// Directories without a requirements file.
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, InstallError)>,
}

impl InstallSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl RequirementsInstaller {
    pub fn new(config: InstallerConfig) -> Self {
        Self { config }
    }

    /// Requirements file inside `dir`, if there is one.
    pub fn requirements_path(&self, dir: &Path) -> Option<PathBuf> {
        let path = dir.join(&self.config.requirements_file);
        path.is_file().then_some(path)
    }

    fn run_pip(&self, dir: &Path, requirements: &Path) -> Result<(), InstallError> {
        tracing::debug!(python = %self.config.python, path = %requirements.display(), "Running pip install");
        let output = Command::new(&self.config.python)
            .args(["-m", "pip", "install", "-r"])
            .arg(requirements)
            .current_dir(dir)
            .output()
            .map_err(|source| InstallError::Spawn {
                program: self.config.python.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }
        Err(InstallError::Failed {
            path: requirements.to_path_buf(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    /// Install the project root's requirements and then every reported
    /// module's, continuing past failures.
    pub fn install_all(&self, root: &Path, report: &ModulesReport) -> InstallSummary {
        let mut summary = InstallSummary::default();
        if !self.config.enabled {
            tracing::info!("Installer disabled, nothing to do");
            return summary;
        }

        let dirs = std::iter::once(root.to_path_buf())
            .chain(report.modules.iter().map(|m| m.path.clone()));
        for dir in dirs {
            let Some(requirements) = self.requirements_path(&dir) else {
                summary.skipped.push(dir);
                continue;
            };
            match self.run_pip(&dir, &requirements) {
                Ok(()) => {
                    tracing::info!(path = %dir.display(), "Installed requirements");
                    summary.installed.push(dir);
                }
                Err(e) => {
                    tracing::warn!(path = %dir.display(), error = %e, "Requirements install failed");
                    summary.failed.push((dir, e));
                }
            }
        }
        summary
    }
}

impl Installer for RequirementsInstaller {
    fn install(&self, destination: &Path) -> Result<(), InstallError> {
        if !self.config.enabled {
            return Ok(());
        }
        match self.requirements_path(destination) {
            Some(requirements) => self.run_pip(destination, &requirements),
            None => Ok(()),
        }
    }
}
