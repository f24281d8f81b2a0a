//! Shared test utilities for the module bootstrapper workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: real module repositories with a committed `init.yaml`
//! - [`project`]: [`project::TestProject`] builder for a project root

pub mod git;
pub mod project;
