//! Tests for module reference parsing

use boot_git::{DEFAULT_HOST, RemoteLocation, RepoAddress};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("https://github.com/org/tools-core", "org", "tools-core", "https://github.com/org/tools-core")]
#[case("https://github.com/org/tools-core.git", "org", "tools-core", "https://github.com/org/tools-core")]
#[case("https://github.com/org/tools-core/", "org", "tools-core", "https://github.com/org/tools-core")]
#[case("git@github.com:org/tools-core.git", "org", "tools-core", "https://github.com/org/tools-core")]
#[case("ssh://git@gitlab.example:2222/group/sub/lib.git", "group/sub", "lib", "https://gitlab.example/group/sub/lib")]
#[case("org/tools-core", "org", "tools-core", "https://github.com/org/tools-core")]
fn test_hosted_identity(
    #[case] reference: &str,
    #[case] owner: &str,
    #[case] name: &str,
    #[case] url: &str,
) {
    let address = RepoAddress::parse(reference, DEFAULT_HOST).unwrap();
    let identity = address.identity();
    assert_eq!(identity.owner, owner);
    assert_eq!(identity.name, name);
    assert_eq!(identity.url, url);
}

#[test]
fn test_shorthand_expands_against_default_host() {
    let address = RepoAddress::parse("org/alpha", "git.example.com").unwrap();
    assert_eq!(address.clone_url(), "https://git.example.com/org/alpha.git");
}

#[test]
fn test_full_url_is_cloned_verbatim() {
    let address = RepoAddress::parse("  https://github.com/org/alpha.git \n", DEFAULT_HOST).unwrap();
    assert_eq!(address.reference(), "https://github.com/org/alpha.git");
    assert_eq!(address.clone_url(), "https://github.com/org/alpha.git");
}

#[test]
fn test_local_path_identity_uses_parent_as_owner() {
    let address = RepoAddress::parse("/srv/remotes/org/FooBar.git", DEFAULT_HOST).unwrap();
    assert!(matches!(address.location(), RemoteLocation::Local { .. }));

    let identity = address.identity();
    assert_eq!(identity.owner, "org");
    assert_eq!(identity.name, "FooBar");
    assert_eq!(identity.url, "/srv/remotes/org/FooBar.git");
}

#[test]
fn test_file_url_is_local() {
    let address = RepoAddress::parse("file:///srv/remotes/org/alpha", DEFAULT_HOST).unwrap();
    assert!(matches!(address.location(), RemoteLocation::Local { .. }));
    assert_eq!(address.clone_url(), "file:///srv/remotes/org/alpha");
    assert_eq!(address.identity().name, "alpha");
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("alpha")]
#[case("https://github.com/alpha")]
#[case("https://github.com")]
fn test_invalid_references_are_rejected(#[case] reference: &str) {
    let err = RepoAddress::parse(reference, DEFAULT_HOST).unwrap_err();
    assert!(
        err.to_string().contains("Invalid repository address"),
        "unexpected error: {err}"
    );
}
