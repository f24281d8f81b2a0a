//! `boot init`

use std::path::Path;

use boot_core::InitOutcome;
use colored::Colorize;

use super::open_project;
use crate::error::Result;

pub fn run_init(root: &Path, workers: Option<usize>) -> Result<()> {
    let mut project = open_project(root)?;
    if let Some(workers) = workers {
        project = project.with_max_workers(workers);
    }

    println!(
        "{} Bootstrapping modules in {}",
        "=>".blue().bold(),
        project.root().display().to_string().cyan()
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(project.init_project())?;

    print_outcome(&outcome, project.root());
    Ok(())
}

fn print_outcome(outcome: &InitOutcome, root: &Path) {
    let resolution = &outcome.resolution;

    for result in &resolution.installed {
        let path = result
            .destination
            .strip_prefix(root)
            .unwrap_or(&result.destination);
        let marker = if result.materialized {
            "+".green().bold()
        } else {
            "=".dimmed()
        };
        println!(
            "  {} {:<24} {:<10} {}",
            marker,
            result.name,
            result.module_type,
            path.display()
        );
    }

    for failure in &resolution.failures {
        println!(
            "  {} {} ({})",
            "x".red().bold(),
            failure,
            failure.kind().to_string().yellow()
        );
    }

    for manifest in &outcome.backfilled {
        println!("  {} repo_url recorded in {}", "~".cyan(), manifest.display());
    }
    for update in &outcome.framework {
        println!("  {} {} {}", "~".cyan(), update.file, update.status);
    }
    for path in &outcome.initializers.ran {
        let path = path.strip_prefix(root).unwrap_or(path);
        println!("  {} initialized {}", "~".cyan(), path.display());
    }
    for (path, error) in &outcome.initializers.failed {
        let path = path.strip_prefix(root).unwrap_or(path);
        println!("  {} {} ({})", "!".yellow().bold(), path.display(), error);
    }
    if let Some(workspace) = &outcome.workspace_file {
        println!("  {} workspace {}", "~".cyan(), workspace.display());
    }

    println!();
    let summary = format!(
        "{} modules resolved ({} cloned), {} failed",
        resolution.installed.len(),
        resolution.materialized_count(),
        resolution.failures.len()
    );
    if resolution.is_clean() {
        println!("{} {}", "OK".green().bold(), summary);
    } else {
        println!("{} {}", "WARN".yellow().bold(), summary);
    }
}
