//! Extension catalog for Extension Installer.
//!
//! This crate provides the extension model, descriptor parsing, version
//! constraints, catalog providers, and the per-extension eligibility checks
//! a selection screen relies on.

pub mod catalog;
pub mod descriptor;
pub mod eligibility;
pub mod error;
pub mod extension;
pub mod host;
pub mod listing;
pub mod provider;
pub mod version;

pub use catalog::Catalog;
pub use descriptor::ExtensionDescriptor;
pub use eligibility::{
    DependencyState, DependencyStatus, Eligibility, Incompatibility, RequiredBy, assess,
};
pub use error::{Error, Result};
pub use extension::{
    CORE_PACKAGE, DEFAULT_PACKAGE, Dependency, EXPERIMENTAL_PACKAGE, Extension, TESTING_PACKAGE,
};
pub use host::HostEnvironment;
pub use listing::{PackageGroup, installable_by_package};
pub use provider::{CatalogProvider, DescriptorDirectory, StaticCatalog};
pub use version::VersionConstraint;
