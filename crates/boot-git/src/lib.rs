//! Git remote access for the module bootstrapper
//!
//! Parses module references into clone addresses and fetches repositories
//! through a per-run staging area of bare mirrors.

pub mod address;
pub mod error;
pub mod remote;

pub use address::{DEFAULT_HOST, RemoteLocation, RepoAddress, RepoIdentity};
pub use error::{Error, Result};
pub use remote::GitRemote;
