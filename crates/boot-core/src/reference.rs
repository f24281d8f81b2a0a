//! Module references and canonical URLs

use std::fmt;
use std::hash::{Hash, Hasher};

use boot_git::RepoIdentity;
use boot_meta::ModuleManifest;

/// A module reference as written, plus the trimmed form used for dedup.
///
/// Equality and hashing only look at the normalized form, so `" org/a "`
/// and `"org/a"` are the same module. Case is significant.
#[derive(Debug, Clone)]
pub struct ModuleReference {
    raw: String,
    normalized: String,
}

impl ModuleReference {
    /// Returns `None` for blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let normalized = normalize_url(&raw)?;
        Some(Self { raw, normalized })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }
}

impl PartialEq for ModuleReference {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for ModuleReference {}

impl Hash for ModuleReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl fmt::Display for ModuleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

/// Normalize a raw reference. Blank input yields `None`.
pub fn normalize(raw: &str) -> Option<ModuleReference> {
    ModuleReference::new(raw)
}

/// Dedup key for a reference or URL string.
pub fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The address a module is known by: the manifest's own `canonical_url`
/// when it has one, else the address synthesized from the fetched identity.
pub fn canonicalize(manifest: &ModuleManifest, identity: &RepoIdentity) -> String {
    manifest
        .canonical_url
        .as_deref()
        .and_then(normalize_url)
        .unwrap_or_else(|| identity.url.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_blank_reference_rejected() {
        assert!(normalize("").is_none());
        assert!(normalize(" \t\n").is_none());
    }

    #[test]
    fn test_trim_only() {
        let a = normalize("  org/A ").unwrap();
        assert_eq!(a.as_str(), "org/A");
        assert_eq!(a.raw(), "  org/A ");
        assert_ne!(a, normalize("org/a").unwrap());
    }

    #[test]
    fn test_hash_uses_normalized_form() {
        let mut set = HashSet::new();
        set.insert(normalize("org/a").unwrap());
        assert!(set.contains(&normalize("\torg/a ").unwrap()));
    }

    #[test]
    fn test_canonical_url_precedence() {
        let identity = RepoIdentity::new("org", "a-renamed", "https://host/org/a-renamed");
        let explicit = ModuleManifest::new("tool").with_canonical_url("https://host/org/a");
        assert_eq!(canonicalize(&explicit, &identity), "https://host/org/a");

        let blank = ModuleManifest::new("tool").with_canonical_url("   ");
        assert_eq!(canonicalize(&blank, &identity), "https://host/org/a-renamed");
    }
}
