//! Installable extensions grouped by package.

use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::extension::{CORE_PACKAGE, Extension, TESTING_PACKAGE};

/// One package and its installable extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageGroup<'a> {
    pub package: &'a str,
    /// Ordered by display name.
    pub extensions: Vec<&'a Extension>,
    /// Whether the group starts collapsed.
    pub collapsed: bool,
}

/// Group extensions that are neither hidden nor enabled by package.
///
/// When `filter` is given, only extensions whose machine name, display
/// name, or description contains it (case-insensitively) are kept. The
/// `Core` package comes first, the rest follow by package title.
pub fn installable_by_package<'a>(catalog: &'a Catalog, filter: Option<&str>) -> Vec<PackageGroup<'a>> {
    let needle = filter
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty());

    let mut groups: BTreeMap<&str, Vec<&Extension>> = BTreeMap::new();
    for extension in catalog.sorted_by_display_name() {
        if extension.hidden || extension.enabled {
            continue;
        }
        if let Some(needle) = &needle {
            if !matches_filter(extension, needle) {
                continue;
            }
        }
        groups
            .entry(extension.package.as_str())
            .or_default()
            .push(extension);
    }

    let mut result: Vec<PackageGroup<'a>> = groups
        .into_iter()
        .map(|(package, extensions)| PackageGroup {
            package,
            extensions,
            collapsed: package == TESTING_PACKAGE,
        })
        .collect();

    result.sort_by(|a, b| {
        (a.package != CORE_PACKAGE)
            .cmp(&(b.package != CORE_PACKAGE))
            .then_with(|| a.package.to_lowercase().cmp(&b.package.to_lowercase()))
    });
    result
}

fn matches_filter(extension: &Extension, needle: &str) -> bool {
    [
        extension.name.as_str(),
        extension.display_name.as_str(),
        extension.description.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::EXPERIMENTAL_PACKAGE;
    use pretty_assertions::assert_eq;

    fn catalog() -> Catalog {
        Catalog::from_extensions([
            Extension::new("system").in_package(CORE_PACKAGE).enabled(),
            Extension::new("views").in_package(CORE_PACKAGE).with_display_name("Views"),
            Extension::new("ban").in_package(CORE_PACKAGE).with_display_name("Ban"),
            Extension::new("workspaces")
                .in_package(EXPERIMENTAL_PACKAGE)
                .with_description("Content staging"),
            Extension::new("address").in_package("Address"),
            Extension::new("fixture").in_package(TESTING_PACKAGE),
            Extension::new("plumbing").in_package(CORE_PACKAGE).hidden(),
        ])
    }

    fn summary<'a>(groups: &[PackageGroup<'a>]) -> Vec<(&'a str, Vec<&'a str>, bool)> {
        groups
            .iter()
            .map(|g| {
                (
                    g.package,
                    g.extensions.iter().map(|e| e.name.as_str()).collect(),
                    g.collapsed,
                )
            })
            .collect()
    }

    #[test]
    fn test_groups_core_first_then_by_title() {
        let catalog = catalog();
        let groups = installable_by_package(&catalog, None);
        assert_eq!(
            summary(&groups),
            vec![
                ("Core", vec!["ban", "views"], false),
                ("Address", vec!["address"], false),
                ("Core (Experimental)", vec!["workspaces"], false),
                ("Testing", vec!["fixture"], true),
            ]
        );
    }

    #[test]
    fn test_filter_matches_description() {
        let catalog = catalog();
        let groups = installable_by_package(&catalog, Some("STAGING"));
        assert_eq!(
            summary(&groups),
            vec![("Core (Experimental)", vec!["workspaces"], false)]
        );
    }

    #[test]
    fn test_blank_filter_is_ignored() {
        let catalog = catalog();
        assert_eq!(
            installable_by_package(&catalog, Some("  ")).len(),
            installable_by_package(&catalog, None).len()
        );
    }
}
