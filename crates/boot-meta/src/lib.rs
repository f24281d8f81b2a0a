//! Manifests, module types and configuration for the module bootstrapper.
//!
//! Everything the resolver consumes is validated here into typed values;
//! raw YAML and TOML never leave this crate.

pub mod config;
pub mod error;
pub mod manifest;
pub mod module_types;

pub use config::{
    BootConfig, ConfigLoader, FrameworkConfig, FrameworkFile, InitializerConfig, InstallerConfig,
    WorkspaceConfig,
};
pub use error::{Error, Result};
pub use manifest::{ModuleManifest, ProjectManifest, set_manifest_field};
pub use module_types::{ModuleTypeDef, ModuleTypeEntry, ModuleTypeRegistry};
