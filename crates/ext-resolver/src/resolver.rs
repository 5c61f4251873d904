//! Install-set computation.
//!
//! [`DependencyResolver::compute_install_set`] turns a selection into the
//! full set of extensions to enable:
//!
//! 1. **Seed**: profile-required extensions and the selection itself,
//!    skipping anything already enabled.
//! 2. **Closure**: every declared dependency of a member, repeated until
//!    nothing new is added.
//! 3. **Requirements**: each candidate is checked once; failures are
//!    removed together with their dependents.
//! 4. **Consistency**: members nothing surviving still pulls in are dropped,
//!    and the bookkeeping maps are pruned to the survivors.

use std::collections::BTreeSet;

use ext_catalog::{Catalog, Extension};

use crate::options::{CascadeDepth, ExperimentalRule, ResolverOptions};
use crate::request::ResolutionRequest;
use crate::requirements::{AllInstallable, RequirementsChecker};
use crate::result::ResolutionResult;

/// Computes install sets against a catalog.
///
/// The resolver holds no state between calls; the same catalog, request,
/// and checker always produce the same result.
#[derive(Debug, Clone)]
pub struct DependencyResolver<C> {
    checker: C,
    options: ResolverOptions,
}

impl<C: RequirementsChecker> DependencyResolver<C> {
    pub fn new(checker: C) -> Self {
        Self::with_options(checker, ResolverOptions::default())
    }

    pub fn with_options(checker: C, options: ResolverOptions) -> Self {
        Self { checker, options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// Compute the install set for `request`.
    ///
    /// Never fails. Names in the request that the catalog does not know are
    /// ignored; dependencies the catalog does not know end up in
    /// [`ResolutionResult::unresolvable`].
    pub fn compute_install_set(
        &self,
        catalog: &Catalog,
        request: &ResolutionRequest,
    ) -> ResolutionResult {
        let mut result = ResolutionResult::default();

        let seeds = self.seed(catalog, request, &mut result);
        tracing::debug!("Seeded {} extension(s): {:?}", seeds.len(), seeds);

        self.expand(catalog, &mut result);
        tracing::debug!(
            "Dependency closure holds {} extension(s)",
            result.to_install.len()
        );

        self.check(catalog, &mut result);
        self.prune_orphans(catalog, &seeds, &mut result);
        result.retain_members();

        tracing::info!(
            "Resolved {} extension(s) to install ({} blocked, {} removed as dependents, {} orphaned)",
            result.to_install.len(),
            result.blocked.len(),
            result.removed_dependents.values().map(BTreeSet::len).sum::<usize>(),
            result.orphaned.len()
        );
        result
    }

    fn is_experimental(&self, extension: &Extension) -> bool {
        extension.is_in_package(&self.options.experimental_package)
    }

    fn seed(
        &self,
        catalog: &Catalog,
        request: &ResolutionRequest,
        result: &mut ResolutionResult,
    ) -> BTreeSet<String> {
        let mut seeds = BTreeSet::new();

        for extension in catalog.iter() {
            if extension.enabled {
                continue;
            }

            let flag = if extension.required {
                self.options.experimental == ExperimentalRule::AllCandidates
            } else if request.contains(&extension.name) {
                true
            } else {
                continue;
            };

            result
                .to_install
                .insert(extension.name.clone(), extension.display_name.clone());
            if flag && self.is_experimental(extension) {
                result.experimental.insert(extension.name.clone());
            }
            seeds.insert(extension.name.clone());
        }

        seeds
    }

    fn expand(&self, catalog: &Catalog, result: &mut ResolutionResult) {
        let mut worklist: BTreeSet<String> = result.to_install.keys().cloned().collect();

        while let Some(name) = worklist.pop_first() {
            let Some(extension) = catalog.get(&name) else {
                continue;
            };

            for dep in extension.dependency_names() {
                if result.to_install.contains_key(dep) {
                    continue;
                }

                let Some(target) = catalog.get(dep) else {
                    tracing::warn!("Extension '{}' depends on unknown extension '{}'", name, dep);
                    result
                        .unresolvable
                        .entry(name.clone())
                        .or_default()
                        .insert(dep.to_string());
                    continue;
                };
                if target.enabled {
                    continue;
                }

                tracing::debug!("Adding '{}' as a dependency of '{}'", dep, name);
                result
                    .to_install
                    .insert(target.name.clone(), target.display_name.clone());
                result
                    .dependencies_added
                    .entry(name.clone())
                    .or_default()
                    .insert(target.name.clone(), target.display_name.clone());
                if self.is_experimental(target) {
                    result.experimental.insert(target.name.clone());
                }
                worklist.insert(target.name.clone());
            }
        }
    }

    fn check(&self, catalog: &Catalog, result: &mut ResolutionResult) {
        let snapshot: Vec<String> = result.to_install.keys().cloned().collect();

        for name in snapshot {
            if self.checker.check_requirements(&name) {
                continue;
            }

            let display_name = catalog
                .get(&name)
                .map(|ext| ext.display_name.clone())
                .unwrap_or_else(|| name.clone());
            tracing::warn!("Extension '{}' failed its requirements check", name);
            result.drop_member(&name);
            result.blocked.insert(name.clone(), display_name);

            let removed: BTreeSet<String> = self
                .dependents_to_remove(catalog, &name)
                .into_iter()
                .filter(|dependent| result.drop_member(dependent).is_some())
                .collect();
            if !removed.is_empty() {
                tracing::debug!("Removed dependents of '{}': {:?}", name, removed);
                result.removed_dependents.insert(name, removed);
            }
        }
    }

    fn dependents_to_remove(&self, catalog: &Catalog, name: &str) -> BTreeSet<String> {
        match self.options.cascade {
            CascadeDepth::Direct => catalog.dependents_of(name).map(str::to_string).collect(),
            CascadeDepth::Transitive => {
                let mut found = BTreeSet::new();
                let mut pending: Vec<&str> = catalog.dependents_of(name).collect();
                while let Some(dependent) = pending.pop() {
                    if dependent != name && found.insert(dependent.to_string()) {
                        pending.extend(catalog.dependents_of(dependent));
                    }
                }
                found
            }
        }
    }

    fn prune_orphans(
        &self,
        catalog: &Catalog,
        seeds: &BTreeSet<String>,
        result: &mut ResolutionResult,
    ) {
        let mut reachable: BTreeSet<&str> = BTreeSet::new();
        let mut pending: Vec<&str> = seeds
            .iter()
            .map(String::as_str)
            .filter(|seed| result.to_install.contains_key(*seed))
            .collect();

        while let Some(name) = pending.pop() {
            if !reachable.insert(name) {
                continue;
            }
            let Some(extension) = catalog.get(name) else {
                continue;
            };
            pending.extend(
                extension
                    .dependency_names()
                    .filter(|dep| result.to_install.contains_key(*dep)),
            );
        }

        let orphans: Vec<String> = result
            .to_install
            .keys()
            .filter(|name| !reachable.contains(name.as_str()))
            .cloned()
            .collect();

        for name in orphans {
            tracing::debug!("Dropping '{}': nothing left depends on it", name);
            result.drop_member(&name);
            result.orphaned.insert(name);
        }
    }
}

impl Default for DependencyResolver<AllInstallable> {
    fn default() -> Self {
        Self::new(AllInstallable)
    }
}
