use std::collections::BTreeSet;

use ext_catalog::{Catalog, EXPERIMENTAL_PACKAGE, Extension};
use ext_resolver::{
    Blocklist, CascadeDepth, DependencyResolver, ExperimentalRule, ResolutionRequest,
    ResolutionResult, ResolverOptions,
};
use proptest::prelude::*;

type Spec = (Vec<usize>, bool, bool, bool);

fn name(i: usize) -> String {
    format!("e{i}")
}

/// Random catalogs of up to eight extensions. Dependency indexes may point
/// past the end of the catalog so missing dependencies show up too.
fn arb_case() -> impl Strategy<Value = (Catalog, ResolutionRequest, Blocklist)> {
    (1usize..8)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(
                    (
                        prop::collection::vec(0..n + 2, 0..4),
                        prop::bool::weighted(0.2),
                        prop::bool::weighted(0.2),
                        any::<bool>(),
                    ),
                    n,
                ),
                prop::collection::vec(0..n + 1, 0..4),
                prop::collection::vec(0..n, 0..3),
            )
        })
        .prop_map(|(specs, requested, blocked): (Vec<Spec>, Vec<usize>, Vec<usize>)| {
            let catalog = specs
                .into_iter()
                .enumerate()
                .map(|(i, (deps, enabled, required, experimental))| {
                    let mut ext = Extension::new(name(i));
                    for dep in deps {
                        ext = ext.depends_on(name(dep));
                    }
                    if enabled {
                        ext = ext.enabled();
                    }
                    if required {
                        ext = ext.required();
                    }
                    if experimental {
                        ext = ext.in_package(EXPERIMENTAL_PACKAGE);
                    }
                    ext
                })
                .collect();
            (
                catalog,
                requested.into_iter().map(name).collect(),
                blocked.into_iter().map(name).collect(),
            )
        })
}

fn arb_options() -> impl Strategy<Value = ResolverOptions> {
    (any::<bool>(), any::<bool>()).prop_map(|(transitive, all)| {
        ResolverOptions::default()
            .with_cascade(if transitive {
                CascadeDepth::Transitive
            } else {
                CascadeDepth::Direct
            })
            .with_experimental_rule(if all {
                ExperimentalRule::AllCandidates
            } else {
                ExperimentalRule::SelectedAndDependencies
            })
    })
}

fn is_seed(catalog: &Catalog, request: &ResolutionRequest, name: &str) -> bool {
    catalog
        .get(name)
        .is_some_and(|ext| !ext.enabled && (ext.required || request.contains(name)))
}

fn reachable_from_seeds(
    catalog: &Catalog,
    request: &ResolutionRequest,
    result: &ResolutionResult,
) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    let mut pending: Vec<&str> = result
        .names()
        .filter(|name| is_seed(catalog, request, name))
        .collect();
    while let Some(name) = pending.pop() {
        if !seen.insert(name.to_string()) {
            continue;
        }
        if let Some(ext) = catalog.get(name) {
            pending.extend(ext.dependency_names().filter(|dep| result.will_install(dep)));
        }
    }
    seen
}

proptest! {
    #[test]
    fn test_resolution_invariants((catalog, request, blocklist) in arb_case(), options in arb_options()) {
        let resolver = DependencyResolver::with_options(blocklist.clone(), options);
        let result = resolver.compute_install_set(&catalog, &request);

        // Nothing already enabled is installed.
        for name in result.names() {
            prop_assert!(!catalog.is_enabled(name));
        }

        // Flags and bookkeeping only mention members.
        for name in &result.experimental {
            prop_assert!(result.will_install(name));
        }
        for (name, added) in &result.dependencies_added {
            prop_assert!(result.will_install(name));
            for dep in added.keys() {
                prop_assert!(result.will_install(dep));
            }
        }

        // Blocked extensions and their direct dependents are gone.
        for name in result.blocked.keys() {
            prop_assert!(!result.will_install(name));
            for dependent in catalog.dependents_of(name) {
                prop_assert!(!result.will_install(dependent));
            }
        }

        // Every member is a seed or needed by one.
        let reachable = reachable_from_seeds(&catalog, &request, &result);
        for name in result.names() {
            prop_assert!(reachable.contains(name), "{} is not reachable", name);
        }

        // Same input, same output.
        let again = resolver.compute_install_set(&catalog, &request);
        prop_assert_eq!(again, result);
    }

    #[test]
    fn test_without_failures_nothing_is_dropped((catalog, request, _blocklist) in arb_case()) {
        let result = DependencyResolver::new(Blocklist::new()).compute_install_set(&catalog, &request);

        prop_assert!(result.blocked.is_empty());
        prop_assert!(result.removed_dependents.is_empty());
        prop_assert!(result.orphaned.is_empty());

        // Every requested, disabled catalog extension is in.
        for name in request.names() {
            if catalog.contains(name) && !catalog.is_enabled(name) {
                prop_assert!(result.will_install(name));
            }
        }
    }
}
