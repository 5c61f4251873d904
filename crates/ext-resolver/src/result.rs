//! Outcome of a resolution.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// The install set and the diagnostics gathered while computing it.
///
/// Every field is a plain ordered map or set of strings, so the result
/// serializes deterministically and survives a trip through an expiring
/// store unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Extensions to enable: machine name to display name.
    pub to_install: BTreeMap<String, String>,
    /// For each member, the dependencies it pulled in (name to display name).
    #[serde(default)]
    pub dependencies_added: BTreeMap<String, BTreeMap<String, String>>,
    /// Members whose package is the experimental marker.
    #[serde(default)]
    pub experimental: BTreeSet<String>,
    /// Declared dependency names that are absent from the catalog, keyed by
    /// the member that declared them.
    #[serde(default)]
    pub unresolvable: BTreeMap<String, BTreeSet<String>>,
    /// Extensions that failed the requirements check (name to display name).
    #[serde(default)]
    pub blocked: BTreeMap<String, String>,
    /// Extensions removed because something they depend on was blocked,
    /// keyed by the blocked name.
    #[serde(default)]
    pub removed_dependents: BTreeMap<String, BTreeSet<String>>,
    /// Members dropped because nothing that survived still pulls them in.
    #[serde(default)]
    pub orphaned: BTreeSet<String>,
}

impl ResolutionResult {
    /// Whether there is nothing to install.
    pub fn is_empty(&self) -> bool {
        self.to_install.is_empty()
    }

    pub fn will_install(&self, name: &str) -> bool {
        self.to_install.contains_key(name)
    }

    /// Install-set names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.to_install.keys().map(String::as_str)
    }

    /// Whether any extension was dropped or flagged along the way.
    pub fn has_diagnostics(&self) -> bool {
        !self.unresolvable.is_empty()
            || !self.blocked.is_empty()
            || !self.removed_dependents.is_empty()
            || !self.orphaned.is_empty()
    }

    /// Remove `name` from the install set along with its own bookkeeping.
    pub(crate) fn drop_member(&mut self, name: &str) -> Option<String> {
        self.experimental.remove(name);
        self.dependencies_added.remove(name);
        self.to_install.remove(name)
    }

    /// Prune `experimental` and `dependencies_added` to surviving members.
    pub(crate) fn retain_members(&mut self) {
        let members = &self.to_install;
        self.experimental.retain(|name| members.contains_key(name));
        self.dependencies_added.retain(|name, added| {
            added.retain(|dep, _| members.contains_key(dep));
            members.contains_key(name) && !added.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ResolutionResult {
        let mut result = ResolutionResult::default();
        result.to_install.insert("forum".into(), "Forum".into());
        result.to_install.insert("comment".into(), "Comment".into());
        result.dependencies_added.insert(
            "forum".into(),
            BTreeMap::from([
                ("comment".to_string(), "Comment".to_string()),
                ("taxonomy".to_string(), "Taxonomy".to_string()),
            ]),
        );
        result.experimental.insert("taxonomy".into());
        result
    }

    #[test]
    fn test_retain_members_prunes_keys_and_entries() {
        let mut result = sample();
        result.retain_members();

        assert!(result.experimental.is_empty());
        assert_eq!(
            result.dependencies_added,
            BTreeMap::from([(
                "forum".to_string(),
                BTreeMap::from([("comment".to_string(), "Comment".to_string())]),
            )])
        );
    }

    #[test]
    fn test_drop_member() {
        let mut result = sample();
        assert_eq!(result.drop_member("forum").as_deref(), Some("Forum"));
        assert!(!result.will_install("forum"));
        assert!(result.dependencies_added.is_empty());
        assert_eq!(result.drop_member("forum"), None);
    }

    #[test]
    fn test_deserializes_with_missing_diagnostics() {
        let result: ResolutionResult =
            serde_json::from_str(r#"{"to_install":{"ban":"Ban"}}"#).unwrap();
        assert!(result.will_install("ban"));
        assert!(!result.has_diagnostics());
        assert_eq!(result.names().collect::<Vec<_>>(), vec!["ban"]);
    }
}
