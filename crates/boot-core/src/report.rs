//! Inventory of installed modules, built from the directory tree
//!
//! The report never looks at resolver state: whatever is on disk under the
//! registered type directories is what gets listed.

use std::path::{Path, PathBuf};

use boot_meta::{ModuleManifest, ModuleTypeRegistry};
use serde::Serialize;

use crate::Result;
use crate::resolver::CloneResult;

/// A module directory found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub name: String,
    /// Registered singular type name of the directory it was found in.
    pub module_type: String,
    pub path: PathBuf,
    /// Declared `repo_url` (or `canonical_url`); `None` when absent or the
    /// manifest is unreadable.
    pub repo_url: Option<String>,
    pub requirements: Vec<String>,
    /// Whether the manifest parsed.
    pub manifest_ok: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModulesReport {
    pub modules: Vec<ModuleInfo>,
}

impl ModulesReport {
    /// Scan every type directory for module directories holding
    /// `manifest_file`. Types are visited in registry order, modules by name.
    pub fn scan(registry: &ModuleTypeRegistry, manifest_file: &str) -> Result<Self> {
        let mut modules = Vec::new();
        for entry in registry.entries() {
            for dir in boot_fs::list_module_dirs(&entry.destination_root)? {
                let manifest_path = dir.join(manifest_file);
                if !manifest_path.is_file() {
                    continue;
                }
                let name = dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();

                let info = match ModuleManifest::load(&manifest_path) {
                    Ok(manifest) => ModuleInfo {
                        name,
                        module_type: entry.name.clone(),
                        path: dir,
                        repo_url: manifest.canonical_url,
                        requirements: manifest.requirements,
                        manifest_ok: true,
                    },
                    Err(e) => {
                        tracing::warn!(path = %manifest_path.display(), error = %e, "Unreadable module manifest");
                        ModuleInfo {
                            name,
                            module_type: entry.name.clone(),
                            path: dir,
                            repo_url: None,
                            requirements: Vec::new(),
                            manifest_ok: false,
                        }
                    }
                };
                modules.push(info);
            }
        }
        Ok(Self { modules })
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn find(&self, path: &Path) -> Option<&ModuleInfo> {
        self.modules.iter().find(|m| m.path == path)
    }

    pub fn of_type<'a>(&'a self, module_type: &'a str) -> impl Iterator<Item = &'a ModuleInfo> + 'a {
        self.modules
            .iter()
            .filter(move |m| m.module_type.eq_ignore_ascii_case(module_type))
    }
}

/// Write the canonical URL of each freshly resolved module into its
/// manifest when the manifest declares no `repo_url`.
///
/// Modules with unreadable manifests are left alone. Returns the manifests
/// that were updated; a manifest that cannot be written is logged and
/// skipped.
pub fn fix_repo_urls(
    report: &ModulesReport,
    installed: &[CloneResult],
    manifest_file: &str,
) -> Vec<PathBuf> {
    let mut updated = Vec::new();
    for module in &report.modules {
        if !module.manifest_ok || module.repo_url.is_some() {
            continue;
        }
        let Some(result) = installed.iter().find(|r| r.destination == module.path) else {
            continue;
        };

        let manifest_path = module.path.join(manifest_file);
        match boot_meta::set_manifest_field(&manifest_path, "repo_url", &result.canonical_url) {
            Ok(()) => {
                tracing::info!(module = %module.name, repo_url = %result.canonical_url, "Recorded repo_url");
                updated.push(manifest_path);
            }
            Err(e) => {
                tracing::warn!(path = %manifest_path.display(), error = %e, "Failed to record repo_url");
            }
        }
    }
    updated
}
