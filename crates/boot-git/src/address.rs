//! Module reference parsing
//!
//! A module reference is whatever a manifest author wrote in a
//! `requirements` list: a full URL, an scp-style ssh address, a local path,
//! or `owner/name` shorthand. [`RepoAddress`] turns it into something git can
//! clone plus the `{owner, name}` identity used for naming and canonical URLs.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Host used to expand `owner/name` shorthand.
pub const DEFAULT_HOST: &str = "github.com";

/// Where a repository lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteLocation {
    /// A repository on a git host, addressed by owner and name.
    Hosted {
        host: String,
        owner: String,
        name: String,
    },
    /// A repository on the local filesystem.
    Local { path: PathBuf },
}

/// Owner/name identity of a repository as resolved by the fetch layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentity {
    pub owner: String,
    pub name: String,
    /// Address synthesized from the identity (`https://host/owner/name`,
    /// or the path for local repositories).
    pub url: String,
}

impl RepoIdentity {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A parsed module reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoAddress {
    reference: String,
    clone_url: String,
    location: RemoteLocation,
}

impl RepoAddress {
    /// Parse a module reference.
    ///
    /// `default_host` expands `owner/name` shorthand into
    /// `https://{default_host}/owner/name.git`.
    pub fn parse(reference: &str, default_host: &str) -> Result<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(invalid(reference, "empty reference"));
        }

        if let Some(path) = reference.strip_prefix("file://") {
            return Ok(Self::local(reference, Path::new(path)));
        }

        if is_local_path(reference) {
            return Ok(Self::local(reference, Path::new(reference)));
        }

        if let Some((_, rest)) = reference.split_once("://") {
            let (authority, path) = rest
                .split_once('/')
                .ok_or_else(|| invalid(reference, "missing repository path"))?;
            let host = strip_user_and_port(authority);
            return Self::hosted(reference, reference.to_string(), host, path);
        }

        if let Some((authority, path)) = split_scp_like(reference) {
            let host = strip_user_and_port(authority);
            return Self::hosted(reference, reference.to_string(), host, path);
        }

        if reference.contains('/') && !reference.contains(':') {
            let mut address = Self::hosted(reference, String::new(), default_host, reference)?;
            if let RemoteLocation::Hosted { host, owner, name } = &address.location {
                address.clone_url = format!("https://{}/{}/{}.git", host, owner, name);
            }
            return Ok(address);
        }

        Err(invalid(
            reference,
            "expected a URL, a local path, or owner/name",
        ))
    }

    /// The trimmed reference this address was parsed from.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// URL or path handed to git for cloning.
    pub fn clone_url(&self) -> &str {
        &self.clone_url
    }

    pub fn location(&self) -> &RemoteLocation {
        &self.location
    }

    /// Owner/name identity plus its synthesized address.
    pub fn identity(&self) -> RepoIdentity {
        match &self.location {
            RemoteLocation::Hosted { host, owner, name } => RepoIdentity::new(
                owner,
                name,
                format!("https://{}/{}/{}", host, owner, name),
            ),
            RemoteLocation::Local { path } => {
                let name = path
                    .file_name()
                    .map(|n| strip_git_suffix(&n.to_string_lossy()).to_string())
                    .unwrap_or_default();
                let owner = path
                    .parent()
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "local".to_string());
                RepoIdentity::new(owner, name, self.reference.clone())
            }
        }
    }

    fn local(reference: &str, path: &Path) -> Self {
        Self {
            reference: reference.to_string(),
            clone_url: reference.to_string(),
            location: RemoteLocation::Local {
                path: path.to_path_buf(),
            },
        }
    }

    fn hosted(reference: &str, clone_url: String, host: &str, path: &str) -> Result<Self> {
        if host.is_empty() {
            return Err(invalid(reference, "missing host"));
        }
        let trimmed = strip_git_suffix(path.trim_matches('/'));
        let (owner, name) = trimmed
            .rsplit_once('/')
            .ok_or_else(|| invalid(reference, "expected owner/name in the repository path"))?;
        if owner.is_empty() || name.is_empty() {
            return Err(invalid(reference, "expected owner/name in the repository path"));
        }

        Ok(Self {
            reference: reference.to_string(),
            clone_url,
            location: RemoteLocation::Hosted {
                host: host.to_string(),
                owner: owner.to_string(),
                name: name.to_string(),
            },
        })
    }
}

fn invalid(reference: &str, reason: &str) -> Error {
    Error::InvalidAddress {
        reference: reference.to_string(),
        reason: reason.to_string(),
    }
}

fn strip_git_suffix(value: &str) -> &str {
    value.strip_suffix(".git").unwrap_or(value)
}

fn strip_user_and_port(authority: &str) -> &str {
    let host = authority.rsplit('@').next().unwrap_or(authority);
    host.split(':').next().unwrap_or(host)
}

/// `user@host:owner/name` without a scheme.
fn split_scp_like(reference: &str) -> Option<(&str, &str)> {
    let (authority, path) = reference.split_once(':')?;
    if authority.contains('/') || !authority.contains('@') {
        return None;
    }
    Some((authority, path))
}

fn is_local_path(reference: &str) -> bool {
    if reference.starts_with('/')
        || reference.starts_with("./")
        || reference.starts_with("../")
        || reference.starts_with("~/")
        || reference.starts_with('\\')
    {
        return true;
    }
    // Windows drive paths: C:\ or C:/
    let bytes = reference.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_user_and_port() {
        assert_eq!(strip_user_and_port("git@github.com"), "github.com");
        assert_eq!(strip_user_and_port("host.example:8443"), "host.example");
    }

    #[test]
    fn test_windows_drive_is_local() {
        assert!(is_local_path("C:\\repos\\org\\a"));
        assert!(is_local_path("d:/repos/org/a"));
        assert!(!is_local_path("org/a"));
    }
}
