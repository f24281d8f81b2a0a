//! Bootstrapper configuration with hierarchical merge
//!
//! Configuration is read from up to three TOML files, each layer deep-merging
//! over the one before it:
//!
//! 1. Global (`<config_dir>/boot/config.toml`)
//! 2. Project (`.boot/config.toml`)
//! 3. Local overrides (`.boot/config.local.toml`)
//!
//! Anything no layer sets keeps its built-in default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use toml::Value;

use crate::{Error, ModuleTypeDef, Result};

/// Directory under the project root holding project configuration.
pub const CONFIG_DIR: &str = ".boot";

/// Effective bootstrapper configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    /// Upper bound on concurrently running fetch tasks.
    pub max_workers: usize,
    /// Manifest file name looked up in the project root and in every module.
    pub manifest_file: String,
    /// Host used to expand `owner/name` shorthand references.
    pub default_host: String,
    pub installer: InstallerConfig,
    pub initializer: InitializerConfig,
    pub framework: FrameworkConfig,
    pub workspace: WorkspaceConfig,
    /// Extra module types, or replacements for built-in ones.
    pub module_types: Vec<ModuleTypeDef>,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            max_workers: 8,
            manifest_file: "init.yaml".to_string(),
            default_host: "github.com".to_string(),
            installer: InstallerConfig::default(),
            initializer: InitializerConfig::default(),
            framework: FrameworkConfig::default(),
            workspace: WorkspaceConfig::default(),
            module_types: Vec::new(),
        }
    }
}

impl BootConfig {
    /// Parse a single TOML document, without layering.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Validation {
            message: e.to_string(),
        })
    }

    /// Built-in module types followed by the configured ones.
    pub fn module_type_defs(&self) -> Vec<ModuleTypeDef> {
        let mut defs = ModuleTypeDef::builtins();
        defs.extend(self.module_types.iter().cloned());
        defs
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_workers < 1 {
            return Err(Error::Validation {
                message: format!("max_workers must be at least 1, got {}", self.max_workers),
            });
        }
        if self.manifest_file.trim().is_empty() {
            return Err(Error::Validation {
                message: "manifest_file must not be empty".to_string(),
            });
        }
        if self.initializer.enabled && self.initializer.script.trim().is_empty() {
            return Err(Error::Validation {
                message: "initializer.script must not be empty".to_string(),
            });
        }
        for def in &self.module_types {
            if def.name.trim().is_empty() || def.plural_name.trim().is_empty() {
                return Err(Error::InvalidModuleType {
                    name: def.name.clone(),
                    reason: "name and plural must be non-empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// `[installer]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    pub enabled: bool,
    /// Interpreter used for `-m pip install`.
    pub python: String,
    pub requirements_file: String,
    /// Refuse to run `init` outside an activated virtual environment.
    pub require_virtualenv: bool,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            python: "python3".to_string(),
            requirements_file: "requirements.txt".to_string(),
            require_virtualenv: false,
        }
    }
}

/// `[initializer]` table: a script run in every module directory after
/// `init` has resolved the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitializerConfig {
    pub enabled: bool,
    /// Program the script is passed to.
    pub program: String,
    /// Script path relative to the module directory. Modules without it
    /// are skipped.
    pub script: String,
}

impl Default for InitializerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "python3".to_string(),
            script: "__init__.py".to_string(),
        }
    }
}

/// A file synced from the framework repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkFile {
    pub path: String,
    #[serde(default)]
    pub executable: bool,
}

impl FrameworkFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            executable: false,
        }
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }
}

/// `[framework]` table. Syncing is off while `repo_url` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    pub repo_url: Option<String>,
    pub files: Vec<FrameworkFile>,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            repo_url: None,
            files: vec![
                FrameworkFile::new("framework.py").executable(),
                FrameworkFile::new("requirements.txt"),
            ],
        }
    }
}

/// `[workspace]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub enabled: bool,
    /// Defaults to `<project dir name>.code-workspace`.
    pub file_name: Option<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file_name: None,
        }
    }
}

/// Loads [`BootConfig`] for a project root.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    global_config_dir_override: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader using the platform config directory for the global layer.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            global_config_dir_override: None,
        }
    }

    /// Loader with a fixed global config directory, so tests never read the
    /// real user config.
    pub fn with_global_config_dir(root: impl Into<PathBuf>, global_config_dir: PathBuf) -> Self {
        Self {
            root: root.into(),
            global_config_dir_override: Some(global_config_dir),
        }
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref dir) = self.global_config_dir_override {
            return Some(dir.clone());
        }
        dirs::config_dir().map(|d| d.join("boot"))
    }

    /// Config files in merge order, whether or not they exist.
    pub fn layer_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(3);
        if let Some(global) = self.global_config_dir() {
            paths.push(global.join("config.toml"));
        }
        paths.push(self.root.join(CONFIG_DIR).join("config.toml"));
        paths.push(self.root.join(CONFIG_DIR).join("config.local.toml"));
        paths
    }

    /// Merge every present layer and validate the result.
    ///
    /// Missing layers are skipped; a layer that is not valid TOML is an
    /// error naming that file.
    pub fn load(&self) -> Result<BootConfig> {
        let mut merged = Value::Table(toml::Table::new());

        for path in self.layer_paths() {
            let Some(layer) = read_layer(&path)? else {
                tracing::debug!(path = %path.display(), "No config layer, skipping");
                continue;
            };
            tracing::debug!(path = %path.display(), "Loading config layer");
            deep_merge(&mut merged, layer);
        }

        let config: BootConfig = merged.try_into().map_err(|e: toml::de::Error| {
            Error::Validation {
                message: e.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn read_layer(path: &Path) -> Result<Option<Value>> {
    let Some(content) = boot_fs::read_text_if_exists(path)? else {
        return Ok(None);
    };
    let table: toml::Table = content.parse().map_err(|e: toml::de::Error| Error::InvalidConfig {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;
    Ok(Some(Value::Table(table)))
}

/// Tables merge key by key; anything else in `other` replaces `base`.
fn deep_merge(base: &mut Value, other: Value) {
    match (base, other) {
        (Value::Table(base_map), Value::Table(other_map)) => {
            for (key, other_val) in other_map {
                match base_map.get_mut(&key) {
                    Some(base_val) => deep_merge(base_val, other_val),
                    None => {
                        base_map.insert(key, other_val);
                    }
                }
            }
        }
        (base, other) => *base = other,
    }
}
