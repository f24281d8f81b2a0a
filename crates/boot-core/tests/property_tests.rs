//! Resolver properties over random module graphs

mod common;

use std::collections::{BTreeSet, HashSet, VecDeque};

use common::{FakeSource, Harness};
use proptest::prelude::*;

fn reference(node: usize) -> String {
    format!("org/m{node}")
}

/// Nodes reachable from `seeds` when only modules with a manifest
/// contribute requirements.
fn reachable(edges: &[Vec<usize>], missing: &HashSet<usize>, seeds: &[usize]) -> BTreeSet<usize> {
    let mut seen = BTreeSet::new();
    let mut queue: VecDeque<usize> = seeds.iter().copied().collect();
    while let Some(node) = queue.pop_front() {
        if !seen.insert(node) || missing.contains(&node) {
            continue;
        }
        queue.extend(edges[node].iter().copied());
    }
    seen
}

fn graph() -> impl Strategy<Value = (Vec<Vec<usize>>, HashSet<usize>, Vec<usize>, usize)> {
    (1usize..9).prop_flat_map(|n| {
        (
            prop::collection::vec(prop::collection::vec(0..n, 0..4), n),
            prop::collection::hash_set(0..n, 0..2),
            prop::collection::vec(0..n, 1..4),
            1usize..5,
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_resolves_reachable_graph_once(
        (edges, missing, seeds, workers) in graph()
    ) {
        let mut source = FakeSource::new();
        for (node, requirements) in edges.iter().enumerate() {
            if missing.contains(&node) {
                source = source.without_manifest(&reference(node));
            } else {
                let requirements: Vec<String> = requirements.iter().map(|&r| reference(r)).collect();
                let requirements: Vec<&str> = requirements.iter().map(String::as_str).collect();
                source = source.module(&reference(node), "tool", &requirements);
            }
        }
        let harness = Harness::new(source);
        let seed_refs: Vec<String> = seeds.iter().map(|&s| reference(s)).collect();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let resolution = runtime.block_on(harness.resolver(workers).resolve(&seed_refs));

        let expected = reachable(&edges, &missing, &seeds);

        // Every reachable module is dispatched exactly once, nothing else is.
        let dispatched = harness.source.dispatched();
        let unique: BTreeSet<String> = dispatched.iter().cloned().collect();
        prop_assert_eq!(unique.len(), dispatched.len());
        let expected_refs: BTreeSet<String> = expected.iter().map(|&n| reference(n)).collect();
        prop_assert_eq!(unique, expected_refs);

        // Reachable modules with a manifest are installed; the rest failed.
        let installed: BTreeSet<String> =
            resolution.installed.iter().map(|r| r.canonical_url.clone()).collect();
        prop_assert_eq!(installed.len(), resolution.installed.len());
        let expected_installed = expected.iter().filter(|&&n| !missing.contains(&n)).count();
        prop_assert_eq!(installed.len(), expected_installed);
        prop_assert_eq!(resolution.failures.len(), expected.len() - expected_installed);

        for result in &resolution.installed {
            prop_assert!(resolution.cloned.contains(&result.canonical_url));
        }
        // Failed references count as processed too.
        for dispatched in harness.source.dispatched() {
            prop_assert!(resolution.cloned.contains(&dispatched));
        }
        prop_assert!(harness.source.peak_concurrency() <= workers);
    }
}
