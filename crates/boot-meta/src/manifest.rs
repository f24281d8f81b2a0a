//! Module and project manifests (`init.yaml`)
//!
//! Manifests are loosely written YAML. This module is the single place where
//! that YAML is validated: unknown keys are ignored, non-string or blank
//! requirement entries are dropped, and optional URL fields are trimmed.
//!
//! ```
//! use boot_meta::ModuleManifest;
//!
//! let manifest = ModuleManifest::from_yaml(
//!     "type: Tool\nrequirements:\n  - org/base\n  - 42\n  - '  '\n",
//! )
//! .unwrap();
//! assert_eq!(manifest.module_type, "Tool");
//! assert_eq!(manifest.requirements, vec!["org/base".to_string()]);
//! ```

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::{Error, Result};

/// A module's own manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleManifest {
    /// Declared module type, as written (lookup is case-insensitive).
    pub module_type: String,
    /// Further module references, trimmed, in declaration order.
    pub requirements: Vec<String>,
    /// Address the module asserts as its own (`canonical_url`, else `repo_url`).
    pub canonical_url: Option<String>,
}

impl ModuleManifest {
    pub fn new(module_type: impl Into<String>) -> Self {
        Self {
            module_type: module_type.into(),
            ..Self::default()
        }
    }

    pub fn with_requirements<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirements = requirements.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_canonical_url(mut self, url: impl Into<String>) -> Self {
        self.canonical_url = Some(url.into());
        self
    }

    /// Parse and validate manifest YAML.
    ///
    /// A missing `type` yields an empty type, which no registry resolves.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let map = parse_mapping(content)?;
        Ok(Self {
            module_type: string_field(&map, "type").unwrap_or_default(),
            requirements: string_list(map.get("requirements")),
            canonical_url: string_field(&map, "canonical_url")
                .or_else(|| string_field(&map, "repo_url")),
        })
    }

    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = boot_fs::read_text(path)?;
        Self::from_yaml(&content)
    }
}

/// The project root manifest listing seed modules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectManifest {
    pub name: Option<String>,
    /// Seed module references, trimmed, in declaration order.
    pub modules: Vec<String>,
}

impl ProjectManifest {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let map = parse_mapping(content)?;
        Ok(Self {
            name: string_field(&map, "name"),
            modules: string_list(map.get("modules")),
        })
    }

    /// Load the project manifest, failing with
    /// [`Error::ProjectManifestNotFound`] when the file is missing.
    pub fn load(path: &Path) -> Result<Self> {
        match boot_fs::read_text_if_exists(path)? {
            Some(content) => Self::from_yaml(&content),
            None => Err(Error::ProjectManifestNotFound {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Set a top-level string field in a manifest file, keeping other keys.
///
/// The file is rewritten atomically. Comments are not preserved.
pub fn set_manifest_field(path: &Path, key: &str, value: &str) -> Result<()> {
    let content = boot_fs::read_text(path)?;
    let parsed: Value = serde_yaml::from_str(&content).map_err(|e| Error::ManifestParse {
        message: e.to_string(),
    })?;

    let mut map = match parsed {
        Value::Mapping(map) => map,
        Value::Null => Mapping::new(),
        other => {
            return Err(Error::InvalidManifest {
                reason: format!("expected a mapping, found {}", value_kind(&other)),
            });
        }
    };
    map.insert(Value::String(key.to_string()), Value::String(value.to_string()));

    let rendered = serde_yaml::to_string(&Value::Mapping(map)).map_err(|e| Error::ManifestParse {
        message: e.to_string(),
    })?;
    boot_fs::write_text(path, &rendered)?;
    Ok(())
}

fn parse_mapping(content: &str) -> Result<Mapping> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| Error::ManifestParse {
        message: e.to_string(),
    })?;
    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Err(Error::InvalidManifest {
            reason: "empty document".to_string(),
        }),
        other => Err(Error::InvalidManifest {
            reason: format!("expected a mapping, found {}", value_kind(&other)),
        }),
    }
}

fn string_field(map: &Mapping, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Sequence(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
