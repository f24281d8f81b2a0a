//! `boot update`

use std::path::Path;

use boot_core::UpdateStatus;
use colored::Colorize;

use super::open_project;
use crate::error::Result;

pub fn run_update(root: &Path, dry_run: bool) -> Result<()> {
    let project = open_project(root)?;
    let updates = project.update_framework(dry_run)?;

    if dry_run {
        println!("{}", "Dry run, no files written".yellow());
    }
    for update in &updates {
        let status = match update.status {
            UpdateStatus::UpToDate => update.status.to_string().dimmed(),
            UpdateStatus::WouldUpdate | UpdateStatus::Updated => update.status.to_string().green(),
            UpdateStatus::Missing => update.status.to_string().red(),
        };
        println!("  {:<24} {}", update.file, status);
    }
    Ok(())
}
