//! Module bootstrapper core
//!
//! Turns the seed modules of a project manifest into a materialized,
//! deduplicated module tree:
//!
//! - **Resolver**: bounded-concurrency fetch loop with cycle-tolerant dedup
//! - **Collaborators**: manifest source, fetch executor and installer traits,
//!   with git- and pip-backed defaults
//! - **Post-pass**: on-disk report, `repo_url` backfill, framework file sync,
//!   module initializers and workspace file generation
//!
//! ```text
//!                 boot-cli
//!                    |
//!                boot-core
//!                    |
//!     +--------------+--------------+
//!     |              |              |
//!  boot-fs        boot-git      boot-meta
//! ```
//!
//! # Example
//!
//! ```ignore
//! use boot_core::ProjectInit;
//!
//! let project = ProjectInit::open(std::path::Path::new("."))?;
//! let outcome = project.init_project().await?;
//! println!("{} modules", outcome.report.len());
//! ```

pub mod error;
pub mod framework;
pub mod git_source;
pub mod initializer;
pub mod installer;
pub mod naming;
pub mod project;
pub mod reference;
pub mod report;
pub mod resolver;
pub mod source;
pub mod workspace;

pub use error::{Error, InitializerError, InstallError, ModuleError, ModuleErrorKind, Result};
pub use framework::{FileUpdate, FrameworkUpdater, UpdateStatus};
pub use git_source::GitModuleSource;
pub use initializer::{InitializerSummary, ModuleInitializer};
pub use installer::{InstallSummary, RequirementsInstaller};
pub use naming::derive_module_name;
pub use project::{InitOutcome, ProjectInit, check_virtualenv};
pub use reference::{ModuleReference, canonicalize, normalize, normalize_url};
pub use report::{ModuleInfo, ModulesReport, fix_repo_urls};
pub use resolver::{BoundedScheduler, CloneResult, Resolution, Resolver};
pub use source::{FetchExecutor, FileSource, Installer, ManifestSource, ModuleSources, NoopInstaller};
pub use workspace::{generate_workspace_file, workspace_file_path};
