//! `boot install`

use std::path::Path;

use colored::Colorize;

use super::open_project;
use crate::error::{CliError, Result};

pub fn run_install(root: &Path) -> Result<()> {
    let project = open_project(root)?;
    let summary = project.install()?;

    for dir in &summary.installed {
        println!("  {} {}", "+".green().bold(), dir.display());
    }
    for (dir, err) in &summary.failed {
        println!("  {} {}: {}", "x".red().bold(), dir.display(), err);
    }
    println!(
        "{} installed, {} without requirements, {} failed",
        summary.installed.len(),
        summary.skipped.len(),
        summary.failed.len()
    );

    if summary.is_success() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} requirements install(s) failed",
            summary.failed.len()
        )))
    }
}
