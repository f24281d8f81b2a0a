//! End-to-end bootstrap runs across all crates
//!
//! Every scenario uses real git repositories on the local filesystem:
//! config loading -> seed manifest -> resolution -> report -> post-pass.

use std::fs;

use boot_core::{ProjectInit, UpdateStatus};
use boot_meta::{ConfigLoader, ModuleManifest};
use boot_test_utils::git;
use boot_test_utils::project::TestProject;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Load the project's layered config with an isolated global layer.
fn open(project: &TestProject, global: &TempDir) -> ProjectInit {
    let config = ConfigLoader::with_global_config_dir(project.root(), global.path().to_path_buf())
        .load()
        .unwrap();
    ProjectInit::with_config(project.root(), config).unwrap()
}

fn quiet_project() -> TestProject {
    let project = TestProject::new();
    project.write_config("max_workers = 3\n[installer]\nenabled = false\n");
    project
}

#[tokio::test]
async fn test_full_tree_with_shared_and_cyclic_requirements() {
    let global = TempDir::new().unwrap();
    let project = quiet_project();

    let base_ref = project.reference("org", "base-lib");
    let app_ref = project.reference("org", "App");
    let base = project.module("org", "base-lib", "library", &[app_ref.as_str()]);
    let helper = project.module("org", "HTTPHelper", "util", &[base_ref.as_str()]);
    let plugin = project.module("org", "fancy-plugin", "plugins", &[base.as_str(), helper.as_str()]);
    let app = project.module("org", "App", "Core", &[plugin.as_str(), helper.as_str()]);
    project.write_seed(&[app.as_str(), plugin.as_str()]);

    let outcome = open(&project, &global).init_project().await.unwrap();

    assert!(outcome.resolution.is_clean(), "{:?}", outcome.resolution.failures);
    let mut names: Vec<&str> = outcome
        .resolution
        .installed
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    names.sort();
    assert_eq!(names, vec!["app", "base_lib", "fancy_plugin", "http_helper"]);

    for path in [
        "cores/app",
        "plugins/fancy_plugin",
        "utils/http_helper",
        "libraries/base_lib",
    ] {
        project.assert_file_exists(&format!("{path}/init.yaml"));
        assert!(project.path(path).join(".git").is_dir(), "{path} is not a clone");
    }

    let listed: Vec<(&str, &str)> = outcome
        .report
        .modules
        .iter()
        .map(|m| (m.module_type.as_str(), m.name.as_str()))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("core", "app"),
            ("util", "http_helper"),
            ("plugin", "fancy_plugin"),
            ("library", "base_lib"),
        ]
    );
}

#[tokio::test]
async fn test_rerun_is_idempotent_and_keeps_backfilled_urls() {
    let global = TempDir::new().unwrap();
    let project = quiet_project();
    let alpha = project.module("org", "alpha", "tool", &[]);
    project.write_seed(&[alpha.as_str()]);

    let first = open(&project, &global).init_project().await.unwrap();
    assert_eq!(first.backfilled.len(), 1);
    let after_first = fs::read_to_string(project.path("tools/alpha/init.yaml")).unwrap();

    let second = open(&project, &global).init_project().await.unwrap();
    assert_eq!(second.resolution.materialized_count(), 0);
    assert_eq!(second.resolution.installed.len(), 1);
    assert!(second.backfilled.is_empty());
    assert_eq!(
        fs::read_to_string(project.path("tools/alpha/init.yaml")).unwrap(),
        after_first
    );

    let manifest = ModuleManifest::load(&project.path("tools/alpha/init.yaml")).unwrap();
    assert_eq!(manifest.canonical_url.as_deref(), Some(alpha.as_str()));
}

#[tokio::test]
async fn test_new_upstream_requirement_is_picked_up_on_rerun() {
    let global = TempDir::new().unwrap();
    let project = quiet_project();
    let alpha = project.module("org", "alpha", "tool", &[]);
    let extra = project.module("org", "extra", "util", &[]);
    project.write_seed(&[alpha.as_str()]);

    let first = open(&project, &global).init_project().await.unwrap();
    assert_eq!(first.resolution.installed.len(), 1);

    // Manifests are read from the remote, not the local checkout.
    git::commit_file(
        std::path::Path::new(&alpha),
        "init.yaml",
        &git::module_manifest("tool", &[extra.as_str()]),
    );

    let second = open(&project, &global).init_project().await.unwrap();
    assert_eq!(second.resolution.installed.len(), 2);
    assert_eq!(second.resolution.materialized_count(), 1);
    project.assert_file_exists("utils/extra/init.yaml");
}

#[tokio::test]
async fn test_two_spellings_of_one_repo_share_a_destination() {
    let global = TempDir::new().unwrap();
    let project = quiet_project();
    let alpha = project.module("org", "alpha", "tool", &[]);
    let as_url = format!("file://{alpha}");
    project.write_seed(&[alpha.as_str(), as_url.as_str()]);

    let outcome = open(&project, &global).init_project().await.unwrap();

    assert!(outcome.resolution.is_clean());
    assert_eq!(outcome.resolution.materialized_count(), 1);
    assert_eq!(outcome.report.len(), 1);
}

#[tokio::test]
async fn test_local_config_layer_overrides_project_layer() {
    let global = TempDir::new().unwrap();
    fs::write(
        global.path().join("config.toml"),
        "[workspace]\nfile_name = 'global.code-workspace'\n",
    )
    .unwrap();

    let project = quiet_project();
    fs::write(
        project.path(".boot/config.local.toml"),
        "[[module_types]]\nname = 'tool'\nplural = 'tools'\ndirectory = 'vendor/tools'\n",
    )
    .unwrap();
    let alpha = project.module("org", "alpha", "tool", &[]);
    project.write_seed(&[alpha.as_str()]);

    let init = open(&project, &global);
    assert_eq!(init.config().max_workers, 3);
    let outcome = init.init_project().await.unwrap();

    project.assert_file_exists("vendor/tools/alpha/init.yaml");
    project.assert_file_not_exists("tools");
    assert_eq!(
        outcome.workspace_file,
        Some(project.path("global.code-workspace"))
    );
    project.assert_file_contains("global.code-workspace", "vendor/tools/alpha");
}

#[tokio::test]
async fn test_framework_and_workspace_post_pass() {
    let global = TempDir::new().unwrap();
    let project = quiet_project();

    let framework = git::module_repo(project.remotes(), "org", "framework", "type: core\n");
    git::commit_file(&framework, "framework.py", "print('v1')\n");
    git::commit_file(&framework, "requirements.txt", "requests\n");
    fs::write(
        project.path(".boot/config.local.toml"),
        format!(
            "[framework]\nrepo_url = '{}'\n[workspace]\nfile_name = 'ws.code-workspace'\n",
            framework.display()
        ),
    )
    .unwrap();
    fs::write(
        project.path("ws.code-workspace"),
        r#"{"folders": [], "settings": {"python.defaultInterpreterPath": ".venv"}}"#,
    )
    .unwrap();

    let alpha = project.module("org", "alpha", "mcp", &[]);
    project.write_seed(&[alpha.as_str()]);

    let outcome = open(&project, &global).init_project().await.unwrap();

    let statuses: Vec<UpdateStatus> = outcome.framework.iter().map(|u| u.status).collect();
    assert_eq!(statuses, vec![UpdateStatus::Updated, UpdateStatus::Updated]);
    project.assert_file_contains("framework.py", "print('v1')");
    project.assert_file_contains("requirements.txt", "requests");

    let workspace: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(project.path("ws.code-workspace")).unwrap())
            .unwrap();
    assert_eq!(
        workspace["folders"],
        serde_json::json!([{"path": "."}, {"path": "mcps/alpha"}])
    );
    assert_eq!(
        workspace["settings"]["python.defaultInterpreterPath"],
        ".venv"
    );

    let check = open(&project, &global).update_framework(true).unwrap();
    assert!(check.iter().all(|u| u.status == UpdateStatus::UpToDate));
}
