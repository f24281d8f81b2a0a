//! VS Code `.code-workspace` generation

use std::path::{Path, PathBuf};

use boot_meta::WorkspaceConfig;
use serde_json::{Map, Value, json};

use crate::Result;
use crate::report::ModulesReport;

/// Where the workspace file goes: the configured name, or
/// `<project dir>.code-workspace`.
pub fn workspace_file_path(root: &Path, config: &WorkspaceConfig) -> PathBuf {
    let file_name = config.file_name.clone().unwrap_or_else(|| {
        let stem = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());
        format!("{stem}.code-workspace")
    });
    root.join(file_name)
}

/// Write the workspace file listing the project root and every reported
/// module. Existing top-level keys other than `folders` are kept.
///
/// Returns `None` when workspace generation is disabled.
pub fn generate_workspace_file(
    root: &Path,
    config: &WorkspaceConfig,
    report: &ModulesReport,
) -> Result<Option<PathBuf>> {
    if !config.enabled {
        return Ok(None);
    }
    let path = workspace_file_path(root, config);

    let mut document = match boot_fs::read_text_if_exists(&path)? {
        Some(content) => match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => map,
            _ => Map::new(),
        },
        None => Map::new(),
    };

    let mut folders: Vec<String> = report
        .modules
        .iter()
        .filter_map(|m| m.path.strip_prefix(root).ok())
        .map(relative_string)
        .collect();
    folders.sort();
    folders.dedup();

    let entries: Vec<Value> = std::iter::once(".".to_string())
        .chain(folders)
        .map(|p| json!({ "path": p }))
        .collect();
    document.insert("folders".to_string(), Value::Array(entries));
    document
        .entry("settings".to_string())
        .or_insert_with(|| json!({}));

    let rendered = serde_json::to_string_pretty(&Value::Object(document))?;
    boot_fs::write_text(&path, &format!("{rendered}\n"))?;
    tracing::info!(path = %path.display(), "Wrote workspace file");
    Ok(Some(path))
}

/// Forward-slash form of a relative path.
fn relative_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
