//! Command implementations

mod init;
mod install;
mod list;
mod update;

pub use init::run_init;
pub use install::run_install;
pub use list::run_list;
pub use update::run_update;

use std::path::Path;

use boot_core::ProjectInit;

use crate::error::{CliError, Result};

/// Open the project at `root` with its layered configuration.
fn open_project(root: &Path) -> Result<ProjectInit> {
    if !root.is_dir() {
        return Err(CliError::user(format!(
            "Project directory {} does not exist",
            root.display()
        )));
    }
    Ok(ProjectInit::open(root)?)
}
