//! Filesystem helpers for the module bootstrapper
//!
//! Atomic writes, project-tree scanning and content digests shared by the
//! manifest, git and core layers.

pub mod checksum;
pub mod error;
pub mod io;
pub mod tree;

pub use error::{Error, Result};
pub use io::{read_text, read_text_if_exists, write_atomic, write_text};
pub use tree::{canonical_root, claim_dir, ensure_dir, list_module_dirs};
