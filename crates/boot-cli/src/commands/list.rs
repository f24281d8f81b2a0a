//! `boot list`

use std::path::Path;

use colored::Colorize;

use super::open_project;
use crate::error::Result;

pub fn run_list(root: &Path, json: bool) -> Result<()> {
    let project = open_project(root)?;
    let report = project.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.is_empty() {
        println!("No modules installed.");
        return Ok(());
    }

    println!("{}", "Installed Modules".bold());
    println!();
    for module in &report.modules {
        let name = if module.manifest_ok {
            module.name.green()
        } else {
            module.name.red()
        };
        println!(
            "  {:<24} {:<10} {}",
            name,
            module.module_type.cyan(),
            module.repo_url.as_deref().unwrap_or("-").dimmed()
        );
        for requirement in &module.requirements {
            println!("      requires {}", requirement);
        }
    }
    println!();
    println!("{} module(s)", report.len());
    Ok(())
}
