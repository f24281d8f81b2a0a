//! Real module repositories built with `git2`.
//!
//! No `git` binary is needed: repositories are initialised and committed
//! through libgit2 so fixtures work on any CI image.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Commit, IndexAddOption, Repository, Signature};

/// Render an `init.yaml` body for a module.
///
/// Requirements are single-quoted so local paths survive YAML parsing on
/// every platform.
pub fn module_manifest(module_type: &str, requirements: &[&str]) -> String {
    let mut manifest = format!("type: {module_type}\n");
    if requirements.is_empty() {
        manifest.push_str("requirements: []\n");
    } else {
        manifest.push_str("requirements:\n");
        for requirement in requirements {
            manifest.push_str(&format!("  - '{}'\n", requirement));
        }
    }
    manifest
}

/// Path a module repository will be created at by [`module_repo`].
///
/// Useful for wiring requirement cycles before both repos exist.
pub fn module_repo_path(base: &Path, owner: &str, name: &str) -> PathBuf {
    base.join(owner).join(name)
}

/// Create `base/owner/name` as a git repository whose single commit holds
/// `init.yaml` with the given content.
///
/// # Panics
/// Panics if any filesystem or git operation fails.
pub fn module_repo(base: &Path, owner: &str, name: &str, manifest: &str) -> PathBuf {
    let path = module_repo_path(base, owner, name);
    fs::create_dir_all(&path)
        .unwrap_or_else(|e| panic!("module_repo: failed to create {}: {e}", path.display()));

    let repo = Repository::init(&path)
        .unwrap_or_else(|e| panic!("module_repo: failed to init {}: {e}", path.display()));
    fs::write(path.join("init.yaml"), manifest)
        .unwrap_or_else(|e| panic!("module_repo: failed to write init.yaml: {e}"));
    commit_all(&repo, "Initial commit");
    path
}

/// Create `base/owner/name` as a git repository with no commits.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn empty_repo(base: &Path, owner: &str, name: &str) -> PathBuf {
    let path = module_repo_path(base, owner, name);
    Repository::init(&path)
        .unwrap_or_else(|e| panic!("empty_repo: failed to init {}: {e}", path.display()));
    path
}

/// Write `relative` inside the repository at `repo_path` and commit it.
///
/// # Panics
/// Panics if any filesystem or git operation fails.
pub fn commit_file(repo_path: &Path, relative: &str, content: &str) {
    let file = repo_path.join(relative);
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file, content)
        .unwrap_or_else(|e| panic!("commit_file: failed to write {}: {e}", file.display()));

    let repo = Repository::open(repo_path)
        .unwrap_or_else(|e| panic!("commit_file: failed to open {}: {e}", repo_path.display()));
    commit_all(&repo, &format!("Add {relative}"));
}

/// Stage everything in the working tree and commit on `HEAD`.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_all(repo: &Repository, message: &str) {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = Signature::now("Test User", "test@test.com").unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap_or_else(|e| panic!("commit_all: commit failed: {e}"));
}
