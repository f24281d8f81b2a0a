//! Per-module initializer scripts run after `init`

use std::path::{Path, PathBuf};
use std::process::Command;

use boot_meta::InitializerConfig;

use crate::error::InitializerError;
use crate::report::{ModuleInfo, ModulesReport};

/// Environment variable carrying the project root into each script.
pub const PROJECT_ROOT_ENV: &str = "BOOT_PROJECT_ROOT";

/// Runs `<program> <script>` inside every module directory that has the
/// script.
#[derive(Debug, Clone)]
pub struct ModuleInitializer {
    root: PathBuf,
    config: InitializerConfig,
}

/// Outcome of [`ModuleInitializer::run_all`].
#[derive(Debug, Default)]
pub struct InitializerSummary {
    pub ran: Vec<PathBuf>,
    /// Module directories without the script.
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, InitializerError)>,
}

impl InitializerSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl ModuleInitializer {
    pub fn new(root: impl Into<PathBuf>, config: InitializerConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Initializer script inside `dir`, if there is one.
    pub fn script_path(&self, dir: &Path) -> Option<PathBuf> {
        let path = dir.join(&self.config.script);
        path.is_file().then_some(path)
    }

    fn run_script(&self, dir: &Path, script: &Path) -> Result<(), InitializerError> {
        tracing::debug!(program = %self.config.program, script = %script.display(), "Running initializer");
        let output = Command::new(&self.config.program)
            .arg(script)
            .current_dir(dir)
            .env(PROJECT_ROOT_ENV, &self.root)
            .output()
            .map_err(|source| InitializerError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }
        Err(InitializerError::Failed {
            path: script.to_path_buf(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    /// Run one module's script. `Ok(false)` when it has none.
    pub fn run(&self, module: &ModuleInfo) -> Result<bool, InitializerError> {
        match self.script_path(&module.path) {
            Some(script) => self.run_script(&module.path, &script).map(|()| true),
            None => Ok(false),
        }
    }

    /// Run every reported module's script in report order, continuing past
    /// failures.
    pub fn run_all(&self, report: &ModulesReport) -> InitializerSummary {
        let mut summary = InitializerSummary::default();
        if !self.config.enabled {
            tracing::debug!("Initializers disabled");
            return summary;
        }

        for module in &report.modules {
            match self.run(module) {
                Ok(true) => {
                    tracing::info!(module = %module.name, "Ran initializer");
                    summary.ran.push(module.path.clone());
                }
                Ok(false) => summary.skipped.push(module.path.clone()),
                Err(e) => {
                    tracing::warn!(module = %module.name, error = %e, "Initializer failed");
                    summary.failed.push((module.path.clone(), e));
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn module(path: &Path) -> ModuleInfo {
        ModuleInfo {
            name: "alpha".to_string(),
            module_type: "tool".to_string(),
            path: path.to_path_buf(),
            repo_url: None,
            requirements: Vec::new(),
            manifest_ok: true,
        }
    }

    fn config(program: &str) -> InitializerConfig {
        InitializerConfig {
            program: program.to_string(),
            ..InitializerConfig::default()
        }
    }

    #[test]
    fn test_module_without_script_is_skipped() {
        let dir = TempDir::new().unwrap();
        let initializer = ModuleInitializer::new(dir.path(), config("definitely-not-a-python"));

        let report = ModulesReport {
            modules: vec![module(dir.path())],
        };
        let summary = initializer.run_all(&report);

        assert_eq!(summary.skipped, vec![dir.path().to_path_buf()]);
        assert!(summary.ran.is_empty() && summary.is_success());
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("__init__.py"), "print('hi')\n").unwrap();
        let initializer = ModuleInitializer::new(dir.path(), config("definitely-not-a-python"));

        assert!(matches!(
            initializer.run(&module(dir.path())),
            Err(InitializerError::Spawn { .. })
        ));
    }

    #[test]
    fn test_disabled_runs_nothing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("__init__.py"), "print('hi')\n").unwrap();
        let initializer = ModuleInitializer::new(
            dir.path(),
            InitializerConfig {
                enabled: false,
                ..config("definitely-not-a-python")
            },
        );

        let summary = initializer.run_all(&ModulesReport {
            modules: vec![module(dir.path())],
        });
        assert!(summary.ran.is_empty() && summary.skipped.is_empty() && summary.is_success());
    }
}
