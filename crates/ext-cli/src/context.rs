//! The loaded site a command runs against

use ext_catalog::{Catalog, CatalogProvider, DescriptorDirectory};
use ext_handoff::{FileStore, Handoff};

use crate::config::Config;
use crate::error::Result;

/// Config plus the catalog scanned from its descriptor directory.
#[derive(Debug)]
pub struct SiteContext {
    pub config: Config,
    pub catalog: Catalog,
}

impl SiteContext {
    /// Scan the configured descriptor directory.
    pub fn load(config: Config) -> Result<Self> {
        let mut provider = DescriptorDirectory::new(config.catalog_dir(), config.host.clone())
            .with_enabled(config.site.enabled.iter().cloned());
        let catalog = provider.refresh()?.clone();
        tracing::debug!(
            "Loaded {} extension(s) from {}",
            catalog.len(),
            provider.root().display()
        );
        Ok(Self { config, catalog })
    }

    /// File-backed handoff under the configured directory.
    pub fn handoff(&self) -> Handoff<FileStore> {
        Handoff::new(FileStore::new(self.config.handoff_dir())).with_ttl(self.config.handoff_ttl())
    }
}
