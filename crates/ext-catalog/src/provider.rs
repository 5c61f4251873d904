//! Catalog providers.
//!
//! A provider owns the current [`Catalog`] and can rebuild it on demand so
//! extensions added since the last scan become visible before a resolution.
//!
//! ```text
//! extensions/
//!   views.toml
//!   views_ui.toml
//!   forum.toml
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::descriptor::ExtensionDescriptor;
use crate::error::{Error, Result};
use crate::host::HostEnvironment;

/// Source of the extension catalog.
pub trait CatalogProvider {
    /// Rescan the underlying source and return the fresh catalog.
    fn refresh(&mut self) -> Result<&Catalog>;

    /// The catalog as of the last refresh.
    fn catalog(&self) -> &Catalog;
}

/// A provider over a fixed, in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    catalog: Catalog,
}

impl StaticCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

impl CatalogProvider for StaticCatalog {
    fn refresh(&mut self) -> Result<&Catalog> {
        Ok(&self.catalog)
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

/// Loads one descriptor per `*.toml` file in a directory.
///
/// Subdirectories are not scanned. A missing directory yields an empty
/// catalog; a malformed descriptor or a duplicated name fails the refresh.
#[derive(Debug, Clone)]
pub struct DescriptorDirectory {
    root: PathBuf,
    host: HostEnvironment,
    enabled: BTreeSet<String>,
    catalog: Catalog,
}

impl DescriptorDirectory {
    /// Create a provider rooted at `root`. Nothing is read until
    /// [`refresh`](CatalogProvider::refresh).
    pub fn new(root: impl Into<PathBuf>, host: HostEnvironment) -> Self {
        Self {
            root: root.into(),
            host,
            enabled: BTreeSet::new(),
            catalog: Catalog::new(),
        }
    }

    /// Mark these extensions as already enabled in the host.
    pub fn with_enabled<I, S>(mut self, enabled: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled = enabled.into_iter().map(Into::into).collect();
        self
    }

    /// Directory being scanned.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scan(&self) -> Result<Catalog> {
        if !self.root.exists() {
            tracing::debug!("Catalog directory {:?} does not exist", self.root);
            return Ok(Catalog::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.root)
            .map_err(|e| Error::io(&self.root, e))?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();
        let mut extensions = Vec::with_capacity(paths.len());

        for path in paths {
            let descriptor = ExtensionDescriptor::from_path(&path)?;
            let name = descriptor.name().to_string();

            if let Some(first) = seen.get(&name) {
                return Err(Error::DuplicateExtension {
                    name,
                    first: first.clone(),
                    second: path,
                });
            }

            let enabled = self.enabled.contains(&name);
            let extension = descriptor
                .into_extension(&self.host, enabled)
                .map_err(|e| Error::InvalidDescriptor {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            tracing::debug!(
                extension = %name,
                enabled,
                core_incompatible = extension.core_incompatible,
                "Loaded descriptor {:?}",
                path
            );

            seen.insert(name, path);
            extensions.push(extension);
        }

        let unknown: Vec<&String> = self
            .enabled
            .iter()
            .filter(|name| !seen.contains_key(*name))
            .collect();
        if !unknown.is_empty() {
            tracing::warn!("Enabled extensions without a descriptor: {:?}", unknown);
        }

        Ok(Catalog::from_extensions(extensions))
    }
}

impl CatalogProvider for DescriptorDirectory {
    fn refresh(&mut self) -> Result<&Catalog> {
        self.catalog = self.scan()?;
        tracing::debug!(
            "Catalog refreshed from {:?}: {} extensions",
            self.root,
            self.catalog.len()
        );
        Ok(&self.catalog)
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
