//! Whole-project bootstrap: config, resolution and post-processing

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use boot_meta::{BootConfig, ConfigLoader, ModuleTypeRegistry, ProjectManifest};

use crate::framework::{FileUpdate, FrameworkUpdater};
use crate::git_source::GitModuleSource;
use crate::initializer::{InitializerSummary, ModuleInitializer};
use crate::installer::{InstallSummary, RequirementsInstaller};
use crate::report::{ModulesReport, fix_repo_urls};
use crate::resolver::{Resolution, Resolver};
use crate::source::{FileSource, ModuleSources};
use crate::workspace::generate_workspace_file;
use crate::{Error, Result};

/// Everything an `init` run produced.
#[derive(Debug)]
pub struct InitOutcome {
    pub resolution: Resolution,
    /// Independent scan of the module tree after resolution.
    pub report: ModulesReport,
    /// Manifests that had `repo_url` filled in.
    pub backfilled: Vec<PathBuf>,
    pub framework: Vec<FileUpdate>,
    /// Initializer scripts run over the reported modules.
    pub initializers: InitializerSummary,
    pub workspace_file: Option<PathBuf>,
}

/// A project root with its configuration and collaborators.
pub struct ProjectInit {
    root: PathBuf,
    config: BootConfig,
    sources: ModuleSources,
    file_source: Arc<dyn FileSource>,
}

impl ProjectInit {
    /// Open `root` with layered configuration and git-backed collaborators.
    pub fn open(root: &Path) -> Result<Self> {
        let root = boot_fs::canonical_root(root)?;
        let config = ConfigLoader::new(&root).load()?;
        Self::with_config(root, config)
    }

    /// Open `root` with an already loaded configuration and git-backed
    /// collaborators.
    pub fn with_config(root: impl Into<PathBuf>, config: BootConfig) -> Result<Self> {
        let git = Arc::new(GitModuleSource::from_config(&config)?);
        let installer = Arc::new(RequirementsInstaller::new(config.installer.clone()));
        let sources = ModuleSources::from_source(Arc::clone(&git), installer);
        Ok(Self {
            root: root.into(),
            config,
            sources,
            file_source: git,
        })
    }

    /// Open `root` with caller-supplied collaborators.
    pub fn with_sources(
        root: impl Into<PathBuf>,
        config: BootConfig,
        sources: ModuleSources,
        file_source: Arc<dyn FileSource>,
    ) -> Self {
        Self {
            root: root.into(),
            config,
            sources,
            file_source,
        }
    }

    /// Override `max_workers`; validated when the run starts.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.config.max_workers = max_workers;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.config.manifest_file)
    }

    /// Build the type registry, creating type directories as needed.
    pub fn registry(&self) -> Result<ModuleTypeRegistry> {
        Ok(ModuleTypeRegistry::build(
            &self.root,
            &self.config.module_type_defs(),
        )?)
    }

    /// Load the seed manifest.
    pub fn load_seeds(&self) -> Result<ProjectManifest> {
        ProjectManifest::load(&self.manifest_path()).map_err(|e| match e {
            boot_meta::Error::ProjectManifestNotFound { path } => {
                Error::ProjectManifestNotFound { path }
            }
            other => Error::Meta(other),
        })
    }

    /// Resolve every module the project requires, then scan the result,
    /// record missing `repo_url`s, sync framework files, run module
    /// initializers and write the workspace file.
    ///
    /// Only configuration problems fail the run; per-module failures are in
    /// [`InitOutcome::resolution`].
    pub async fn init_project(&self) -> Result<InitOutcome> {
        check_virtualenv(&self.config, std::env::var_os("VIRTUAL_ENV"))?;
        let seeds = self.load_seeds()?;
        let registry = Arc::new(self.registry()?);
        let resolver = Resolver::new(
            Arc::clone(&registry),
            self.sources.clone(),
            self.config.max_workers,
        )?;

        let resolution = resolver.resolve(&seeds.modules).await;

        let report = ModulesReport::scan(&registry, &self.config.manifest_file)?;
        let backfilled = fix_repo_urls(&report, &resolution.installed, &self.config.manifest_file);

        let framework = self.framework_updater();
        let framework = if framework.is_configured() {
            match framework.update_all(false) {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::error!(error = %e, "Framework update failed");
                    Vec::new()
                }
            }
        } else {
            tracing::debug!("No framework repository configured");
            Vec::new()
        };

        let initializers = self.initializer().run_all(&report);

        let workspace_file =
            match generate_workspace_file(&self.root, &self.config.workspace, &report) {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to write workspace file");
                    None
                }
            };

        Ok(InitOutcome {
            resolution,
            report,
            backfilled,
            framework,
            initializers,
            workspace_file,
        })
    }

    /// Scan the module tree.
    pub fn list(&self) -> Result<ModulesReport> {
        let registry = self.registry()?;
        ModulesReport::scan(&registry, &self.config.manifest_file)
    }

    /// Install requirements for the project root and every module on disk.
    pub fn install(&self) -> Result<InstallSummary> {
        let report = self.list()?;
        let installer = RequirementsInstaller::new(self.config.installer.clone());
        Ok(installer.install_all(&self.root, &report))
    }

    pub fn initializer(&self) -> ModuleInitializer {
        ModuleInitializer::new(&self.root, self.config.initializer.clone())
    }

    pub fn framework_updater(&self) -> FrameworkUpdater {
        FrameworkUpdater::new(
            &self.root,
            self.config.framework.clone(),
            Arc::clone(&self.file_source),
        )
    }

    /// Sync framework files, failing when no framework repository is set.
    pub fn update_framework(&self, dry_run: bool) -> Result<Vec<FileUpdate>> {
        self.framework_updater().update_all(dry_run)
    }
}

/// Enforce `installer.require_virtualenv` given the value of `VIRTUAL_ENV`.
pub fn check_virtualenv(config: &BootConfig, virtual_env: Option<OsString>) -> Result<()> {
    if !config.installer.require_virtualenv {
        return Ok(());
    }
    match virtual_env {
        Some(value) if !value.is_empty() => Ok(()),
        _ => Err(Error::VirtualEnvRequired),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requiring_venv() -> BootConfig {
        let mut config = BootConfig::default();
        config.installer.require_virtualenv = true;
        config
    }

    #[test]
    fn test_virtualenv_not_required_by_default() {
        assert!(check_virtualenv(&BootConfig::default(), None).is_ok());
    }

    #[test]
    fn test_virtualenv_required() {
        let config = requiring_venv();
        assert!(matches!(
            check_virtualenv(&config, None),
            Err(Error::VirtualEnvRequired)
        ));
        assert!(matches!(
            check_virtualenv(&config, Some(OsString::new())),
            Err(Error::VirtualEnvRequired)
        ));
        assert!(check_virtualenv(&config, Some("/venv".into())).is_ok());
    }
}
