//! On-disk module names

use std::sync::LazyLock;

use regex::Regex;

static ACRONYM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("Invalid acronym regex"));
static CASE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("Invalid case regex"));
static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("Invalid underscore regex"));

/// Turn a repository name into a snake_case directory name.
///
/// ```
/// use boot_core::derive_module_name;
///
/// assert_eq!(derive_module_name("HTTPServer-Tools"), "http_server_tools");
/// assert_eq!(derive_module_name("my--repo_"), "my_repo");
/// ```
pub fn derive_module_name(repo_name: &str) -> String {
    let name = repo_name.replace('-', "_");
    let name = ACRONYM_BOUNDARY.replace_all(&name, "${1}_${2}");
    let name = CASE_BOUNDARY.replace_all(&name, "${1}_${2}");
    let name = UNDERSCORE_RUN.replace_all(&name, "_");
    name.trim_matches('_').to_lowercase()
}
