//! Extension descriptor parsing.
//!
//! Each extension ships a TOML descriptor declaring its metadata, host
//! requirements, and dependencies. A catalog directory holds one
//! descriptor per extension; see [`DescriptorDirectory`](crate::DescriptorDirectory).
//!
//! # Example TOML
//!
//! ```toml
//! dependencies = ["drupal:views (>=10.0)", "text"]
//!
//! [extension]
//! name = "views_ui"
//! display_name = "Views UI"
//! version = "10.2.0"
//! description = "Administrative interface for Views."
//! package = "Core"
//!
//! [requires]
//! core = ">=10.0"
//! runtime = "8.1"
//! binaries = ["convert"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extension::{DEFAULT_PACKAGE, Dependency, Extension, validate_name};
use crate::host::HostEnvironment;
use crate::version::{VersionConstraint, normalize_version};

/// A complete extension descriptor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtensionDescriptor {
    /// Dependency strings, see [`Dependency::parse`].
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Core metadata.
    pub extension: DescriptorMeta,
    /// Host requirements.
    #[serde(default)]
    pub requires: Option<Requirements>,
}

/// Basic metadata about an extension.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorMeta {
    /// Machine name (e.g., "views_ui").
    pub name: String,
    /// Human-readable name; defaults to the machine name.
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Package label; defaults to [`DEFAULT_PACKAGE`].
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    /// Required by the install profile.
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub explanation: Option<String>,
    /// Declared incompatible with the host core regardless of `requires.core`.
    #[serde(default)]
    pub core_incompatible: bool,
}

/// Host requirements.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Requirements {
    /// Constraint on the host core version (e.g., ">=10.0,<11").
    #[serde(default)]
    pub core: Option<String>,
    /// Minimum host runtime version (e.g., "8.1").
    #[serde(default)]
    pub runtime: Option<String>,
    /// Executables that must be on `PATH`.
    #[serde(default)]
    pub binaries: Vec<String>,
}

impl ExtensionDescriptor {
    /// Parse a descriptor from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let descriptor: Self = toml::from_str(content)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Read and parse a descriptor file.
    ///
    /// Errors name the offending file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let descriptor: Self = toml::from_str(&content).map_err(|source| Error::DescriptorParse {
            path: path.to_path_buf(),
            source,
        })?;
        descriptor
            .validate()
            .map_err(|e| Error::InvalidDescriptor {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(descriptor)
    }

    /// The declared machine name.
    pub fn name(&self) -> &str {
        &self.extension.name
    }

    fn validate(&self) -> Result<()> {
        validate_name(&self.extension.name)?;

        for dep in &self.dependencies {
            Dependency::parse(dep)?;
        }

        if let Some(requires) = &self.requires {
            if let Some(core) = &requires.core {
                VersionConstraint::parse(core)?;
            }
            if let Some(runtime) = &requires.runtime {
                normalize_version(runtime).map_err(|reason| Error::VersionConstraintParse {
                    constraint: runtime.clone(),
                    reason,
                })?;
            }
        }

        Ok(())
    }

    /// Convert into a catalog entry for `host`.
    ///
    /// `core_incompatible` is set when the descriptor says so or when the
    /// host core version does not satisfy `requires.core`.
    pub fn into_extension(self, host: &HostEnvironment, enabled: bool) -> Result<Extension> {
        let dependencies = self
            .dependencies
            .iter()
            .map(|dep| Dependency::parse(dep))
            .collect::<Result<Vec<_>>>()?;

        let requires = self.requires.unwrap_or_default();
        let core_satisfied = match &requires.core {
            Some(core) => VersionConstraint::parse(core)?.satisfies(&host.core_version),
            None => true,
        };

        let meta = self.extension;
        Ok(Extension {
            display_name: meta.display_name.unwrap_or_else(|| meta.name.clone()),
            name: meta.name,
            description: meta.description.unwrap_or_default(),
            version: meta.version.unwrap_or_default(),
            package: meta
                .package
                .unwrap_or_else(|| DEFAULT_PACKAGE.to_string()),
            enabled,
            required: meta.required,
            hidden: meta.hidden,
            explanation: meta.explanation,
            core_incompatible: meta.core_incompatible || !core_satisfied,
            core_requirement: requires.core,
            runtime_minimum: requires.runtime,
            required_binaries: requires
                .binaries
                .into_iter()
                .filter(|tool| !tool.trim().is_empty())
                .collect(),
            dependencies,
            dependents: Default::default(),
        })
    }
}
