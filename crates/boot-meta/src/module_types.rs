//! Module type registry
//!
//! Maps a manifest's declared `type` to the directory its modules live in.
//!
//! # Example
//!
//! ```
//! use boot_meta::{ModuleTypeDef, ModuleTypeRegistry};
//!
//! let root = tempfile::tempdir().unwrap();
//! let registry =
//!     ModuleTypeRegistry::build(root.path(), &[ModuleTypeDef::new("tool", "tools")]).unwrap();
//!
//! assert_eq!(registry.resolve("TOOLS"), Some(root.path().join("tools").as_path()));
//! assert!(registry.resolve("widget").is_none());
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A module type as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleTypeDef {
    pub name: String,
    #[serde(rename = "plural")]
    pub plural_name: String,
    /// Directory relative to the project root; defaults to the plural name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl ModuleTypeDef {
    pub fn new(name: impl Into<String>, plural_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plural_name: plural_name.into(),
            directory: None,
        }
    }

    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Directory relative to the project root.
    pub fn directory(&self) -> &str {
        self.directory.as_deref().unwrap_or(&self.plural_name)
    }

    /// Types every project knows about.
    pub fn builtins() -> Vec<Self> {
        vec![
            Self::new("core", "cores"),
            Self::new("manager", "managers"),
            Self::new("util", "utils"),
            Self::new("plugin", "plugins"),
            Self::new("mcp", "mcps"),
            Self::new("tool", "tools"),
            Self::new("library", "libraries"),
        ]
    }
}

/// A registered type with its absolute destination root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleTypeEntry {
    pub name: String,
    pub plural_name: String,
    pub destination_root: PathBuf,
}

/// Case-insensitive lookup from singular or plural type name to entry.
#[derive(Debug, Clone, Default)]
pub struct ModuleTypeRegistry {
    entries: Vec<ModuleTypeEntry>,
    index: HashMap<String, usize>,
}

impl ModuleTypeRegistry {
    /// Build a registry rooted at `root`, then create every destination
    /// directory that does not exist yet.
    ///
    /// A later definition with the same singular name replaces an earlier
    /// one, so configured types can relocate built-in ones.
    pub fn build(root: &Path, defs: &[ModuleTypeDef]) -> Result<Self> {
        let mut registry = Self::default();
        for def in defs {
            registry.register(root, def)?;
        }
        for entry in &registry.entries {
            boot_fs::ensure_dir(&entry.destination_root)?;
        }
        Ok(registry)
    }

    fn register(&mut self, root: &Path, def: &ModuleTypeDef) -> Result<()> {
        let key = def.name.trim().to_lowercase();
        let plural_key = def.plural_name.trim().to_lowercase();
        if key.is_empty() || plural_key.is_empty() {
            return Err(Error::InvalidModuleType {
                name: def.name.clone(),
                reason: "name and plural must be non-empty".to_string(),
            });
        }

        let entry = ModuleTypeEntry {
            name: def.name.trim().to_string(),
            plural_name: def.plural_name.trim().to_string(),
            destination_root: root.join(def.directory()),
        };

        let idx = match self.index.get(&key).copied() {
            Some(idx) => {
                let old_plural = self.entries[idx].plural_name.to_lowercase();
                self.index.remove(&old_plural);
                self.entries[idx] = entry;
                idx
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        self.index.insert(key, idx);
        self.index.insert(plural_key, idx);
        Ok(())
    }

    /// Look up a type by singular or plural name, ignoring case and
    /// surrounding whitespace.
    pub fn entry(&self, type_name: &str) -> Option<&ModuleTypeEntry> {
        let key = type_name.trim().to_lowercase();
        self.index.get(&key).map(|&idx| &self.entries[idx])
    }

    /// Destination root for a type, if registered.
    pub fn resolve(&self, type_name: &str) -> Option<&Path> {
        self.entry(type_name).map(|e| e.destination_root.as_path())
    }

    /// Registered entries in definition order.
    pub fn entries(&self) -> &[ModuleTypeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
