//! Catalog scenarios driven from descriptor files

use std::fs;
use std::path::Path;

use ext_catalog::{
    CatalogProvider, DependencyState, DescriptorDirectory, HostEnvironment, RequiredBy, assess,
    installable_by_package,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

fn write(dir: &Path, stem: &str, content: &str) {
    fs::write(dir.join(format!("{stem}.toml")), content).unwrap();
}

fn site() -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    write(
        dir,
        "system",
        "[extension]\nname = \"system\"\npackage = \"Core\"\nrequired = true\n",
    );
    write(
        dir,
        "views",
        "[extension]\nname = \"views\"\ndisplay_name = \"Views\"\nversion = \"10.2.0\"\npackage = \"Core\"\n",
    );
    write(
        dir,
        "views_ui",
        "dependencies = [\"drupal:views (>=10.0)\", \"system\"]\n\n\
         [extension]\nname = \"views_ui\"\ndisplay_name = \"Views UI\"\npackage = \"Core\"\n",
    );
    write(
        dir,
        "modern",
        "[extension]\nname = \"modern\"\npackage = \"Contrib\"\n\n[requires]\ncore = \">=11.0\"\nruntime = \"8.1\"\n",
    );
    temp
}

#[test]
fn test_enabled_extensions_drop_out_of_listing() {
    let temp = site();
    let mut provider = DescriptorDirectory::new(temp.path(), HostEnvironment::default())
        .with_enabled(["system"]);
    let catalog = provider.refresh().unwrap();

    let listed: Vec<(&str, Vec<&str>)> = installable_by_package(catalog, None)
        .into_iter()
        .map(|g| (g.package, g.extensions.iter().map(|e| e.name.as_str()).collect()))
        .collect();
    assert_eq!(
        listed,
        vec![("Core", vec!["views", "views_ui"]), ("Contrib", vec!["modern"])]
    );
}

#[rstest]
#[case::current_core("10.2.0", false)]
#[case::next_core("11.0.0", true)]
fn test_core_requirement_follows_host(#[case] core: &str, #[case] selectable: bool) {
    let temp = site();
    let host = HostEnvironment::new(core, "8.3.0");
    let mut provider = DescriptorDirectory::new(temp.path(), host.clone());
    let catalog = provider.refresh().unwrap();

    let modern = catalog.get("modern").unwrap();
    assert_eq!(modern.core_incompatible, !selectable);
    assert_eq!(assess(catalog, modern, &host).selectable, selectable);
}

#[test]
fn test_views_ui_eligibility_from_descriptors() {
    let temp = site();
    let host = HostEnvironment::default();
    let mut provider =
        DescriptorDirectory::new(temp.path(), host.clone()).with_enabled(["system"]);
    let catalog = provider.refresh().unwrap();

    let eligibility = assess(catalog, catalog.get("views_ui").unwrap(), &host);
    assert!(eligibility.selectable);
    let states: Vec<&DependencyState> = eligibility.requires.iter().map(|d| &d.state).collect();
    assert_eq!(states, vec![&DependencyState::Disabled, &DependencyState::Enabled]);

    let system = assess(catalog, catalog.get("system").unwrap(), &host);
    assert!(system.required_by.contains(&RequiredBy::Extension {
        name: "views_ui".to_string(),
        display_name: "Views UI".to_string(),
        enabled: false,
    }));
}
