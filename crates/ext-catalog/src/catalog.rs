//! The extension catalog: every known extension keyed by name.

use std::collections::{BTreeMap, BTreeSet};

use crate::extension::Extension;

/// Snapshot of all known extensions.
///
/// Iteration is ordered by machine name. The `dependents` of every entry
/// is kept equal to the transpose of `dependencies`, restricted to names
/// present in the catalog; dependencies on absent names contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    extensions: BTreeMap<String, Extension>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from extensions. Later entries replace earlier
    /// entries with the same name.
    pub fn from_extensions(extensions: impl IntoIterator<Item = Extension>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|ext| (ext.name.clone(), ext))
            .collect();
        let mut catalog = Self { extensions };
        catalog.link_dependents();
        catalog
    }

    /// Insert or replace an extension and recompute dependents.
    pub fn insert(&mut self, extension: Extension) {
        self.extensions.insert(extension.name.clone(), extension);
        self.link_dependents();
    }

    /// Look up an extension by name.
    pub fn get(&self, name: &str) -> Option<&Extension> {
        self.extensions.get(name)
    }

    /// Check if an extension is present.
    pub fn contains(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }

    /// Whether `name` is present and already enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).is_some_and(|ext| ext.enabled)
    }

    /// Names of the extensions declaring a dependency on `name`.
    ///
    /// Empty for names absent from the catalog.
    pub fn dependents_of(&self, name: &str) -> impl Iterator<Item = &str> {
        self.get(name)
            .into_iter()
            .flat_map(|ext| ext.dependents.iter().map(String::as_str))
    }

    /// Iterate extensions in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.extensions.values()
    }

    /// All names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.extensions.keys().map(String::as_str)
    }

    /// Extensions ordered by display name, then machine name.
    pub fn sorted_by_display_name(&self) -> Vec<&Extension> {
        let mut sorted: Vec<&Extension> = self.extensions.values().collect();
        sorted.sort_by(|a, b| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        sorted
    }

    /// Number of extensions.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    fn link_dependents(&mut self) {
        let mut dependents: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for ext in self.extensions.values() {
            for dep in ext.dependency_names() {
                if self.extensions.contains_key(dep) && dep != ext.name {
                    dependents
                        .entry(dep.to_string())
                        .or_default()
                        .insert(ext.name.clone());
                }
            }
        }

        for (name, ext) in &mut self.extensions {
            ext.dependents = dependents.remove(name).unwrap_or_default();
        }
    }
}

impl FromIterator<Extension> for Catalog {
    fn from_iter<I: IntoIterator<Item = Extension>>(iter: I) -> Self {
        Self::from_extensions(iter)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Extension;
    type IntoIter = std::collections::btree_map::Values<'a, String, Extension>;

    fn into_iter(self) -> Self::IntoIter {
        self.extensions.values()
    }
}
