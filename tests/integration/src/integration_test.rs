//! End-to-end integration test for the install flow
//!
//! Descriptors on disk -> catalog refresh -> selection validation ->
//! resolution with host checks -> handoff -> confirmation.

use std::collections::BTreeMap;
use std::time::Duration;

use ext_catalog::{CatalogProvider, DescriptorDirectory, Error as CatalogError, HostEnvironment};
use ext_handoff::{FileStore, Handoff, ManualClock};
use ext_resolver::{
    DependencyResolver, Error as ResolverError, ResolutionRequest, ResolutionResult,
    SystemRequirements,
};
use ext_test_utils::catalog::{SAMPLE_ENABLED, sample_catalog};
use ext_test_utils::site::TestSite;
use pretty_assertions::assert_eq;

fn provider(site: &TestSite, host: &HostEnvironment) -> DescriptorDirectory {
    DescriptorDirectory::new(site.extensions_dir(), host.clone())
        .with_enabled(SAMPLE_ENABLED.iter().copied())
}

#[test]
fn test_directory_matches_in_memory_sample() {
    let site = TestSite::with_sample();
    let host = HostEnvironment::default();
    let mut provider = provider(&site, &host);

    let catalog = provider.refresh().unwrap();
    assert_eq!(catalog, &sample_catalog());
    assert!(catalog.get("legacy").unwrap().core_incompatible);
    assert_eq!(
        catalog.dependents_of("text").collect::<Vec<_>>(),
        vec!["comment", "internal", "node", "taxonomy"]
    );
}

#[test]
fn test_select_resolve_handoff_confirm() {
    let site = TestSite::with_sample();
    let host = HostEnvironment::default();
    let mut provider = provider(&site, &host);
    let catalog = provider.refresh().unwrap().clone();

    // Selection step
    let request =
        ResolutionRequest::validated(&catalog, &host, ["forum", "image", "views_ui", "user"]).unwrap();
    let empty_path = tempfile::tempdir().unwrap();
    let checker =
        SystemRequirements::new(&catalog, &host).with_search_path(empty_path.path().as_os_str());
    let result = DependencyResolver::new(checker).compute_install_set(&catalog, &request);

    assert_eq!(
        result.names().collect::<Vec<_>>(),
        vec!["comment", "dblog", "forum", "taxonomy", "text", "views", "views_ui"]
    );
    assert_eq!(
        result.blocked,
        BTreeMap::from([("image".to_string(), "Image".to_string())])
    );

    let clock = ManualClock::default();
    let handoff = Handoff::new(FileStore::with_clock(site.root().join("handoff"), clock.clone()))
        .with_ttl(Duration::from_secs(60));
    handoff.stash("admin", &result).unwrap();

    // The stashed entry is plain JSON: string maps and lists only.
    let raw = std::fs::read_to_string(site.root().join("handoff/install-plan.admin.json")).unwrap();
    let stashed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stashed["value"]["to_install"]["forum"], "Forum");
    assert_eq!(stashed["value"]["blocked"], serde_json::json!({"image": "Image"}));
    assert_eq!(
        serde_json::from_value::<ResolutionResult>(stashed["value"].clone()).unwrap(),
        result
    );

    // Confirmation step, a little later
    clock.advance(chrono::Duration::seconds(20));
    let confirmed: ResolutionResult = handoff.take("admin").unwrap().unwrap();
    assert_eq!(confirmed, result);
    assert!(handoff.take::<ResolutionResult>("admin").unwrap().is_none());
}

#[test]
fn test_expired_plan_cannot_be_confirmed() {
    let site = TestSite::with_sample();
    let catalog = sample_catalog();
    let request: ResolutionRequest = ["node"].into_iter().collect();
    let result = DependencyResolver::default().compute_install_set(&catalog, &request);

    let clock = ManualClock::default();
    let handoff = Handoff::new(FileStore::with_clock(site.root().join("handoff"), clock.clone()));
    handoff.stash("admin", &result).unwrap();

    clock.advance(chrono::Duration::seconds(61));
    assert!(handoff.take::<ResolutionResult>("admin").unwrap().is_none());
}

#[test]
fn test_refresh_picks_up_new_descriptor() {
    let site = TestSite::with_sample();
    let host = HostEnvironment::default();
    let mut provider = provider(&site, &host);
    assert!(provider.refresh().unwrap().get("ghost").is_none());

    site.write_descriptor("ghost", "[extension]\nname = \"ghost\"\n");
    let catalog = provider.refresh().unwrap().clone();

    assert!(catalog.contains("ghost"));
    let request = ResolutionRequest::validated(&catalog, &host, ["broken"]).unwrap();
    let result = DependencyResolver::default().compute_install_set(&catalog, &request);
    assert!(result.will_install("ghost"));
    assert!(result.unresolvable.is_empty());
}

#[test]
fn test_newer_core_makes_legacy_selectable_only_when_compatible() {
    let site = TestSite::with_sample();
    let old_core = HostEnvironment::new("9.5.0", "8.3.0");
    let catalog = provider(&site, &old_core).refresh().unwrap().clone();

    assert!(!catalog.get("legacy").unwrap().core_incompatible);
    assert!(ResolutionRequest::validated(&catalog, &old_core, ["legacy"]).is_ok());

    let current = HostEnvironment::default();
    let catalog = provider(&site, &current).refresh().unwrap().clone();
    let err = ResolutionRequest::validated(&catalog, &current, ["legacy"]).unwrap_err();
    assert!(matches!(err, ResolverError::NotSelectable { .. }));
}

#[test]
fn test_malformed_descriptor_names_file() {
    let site = TestSite::with_sample();
    site.write_descriptor("zz_bad", "[extension\nname = ");
    let host = HostEnvironment::default();

    let err = provider(&site, &host).refresh().unwrap_err();
    assert!(matches!(err, CatalogError::DescriptorParse { .. }));
    assert!(err.to_string().contains("zz_bad.toml"));
}
