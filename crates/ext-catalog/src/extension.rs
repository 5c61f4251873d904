//! Catalog entries: extensions and the dependencies they declare.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::version::VersionConstraint;

/// Package label for core extensions. Listed before every other package.
pub const CORE_PACKAGE: &str = "Core";

/// Package label marking extensions as unstable/preview.
pub const EXPERIMENTAL_PACKAGE: &str = "Core (Experimental)";

/// Package label for test-only extensions. Collapsed in listings.
pub const TESTING_PACKAGE: &str = "Testing";

/// Package used when a descriptor does not declare one.
pub const DEFAULT_PACKAGE: &str = "Other";

/// A dependency declared by an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Name of the extension depended upon.
    pub name: String,
    /// Project the dependency belongs to, when written as `project:name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Optional constraint on the dependency's version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<VersionConstraint>,
}

impl Dependency {
    /// A dependency on `name` with no version constraint.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            project: None,
            constraint: None,
        }
    }

    /// Attach a version constraint.
    pub fn with_constraint(mut self, constraint: VersionConstraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Parse a dependency string: `name`, `project:name`, or either form
    /// followed by a parenthesised constraint, e.g. `drupal:views (>=10.0)`.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let invalid = |reason: &str| Error::InvalidDependency {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let (target, constraint) = match trimmed.split_once('(') {
            Some((target, rest)) => {
                let inner = rest
                    .strip_suffix(')')
                    .ok_or_else(|| invalid("unterminated version constraint"))?;
                (target.trim(), Some(VersionConstraint::parse(inner)?))
            }
            None => (trimmed, None),
        };

        let (project, name) = match target.split_once(':') {
            Some((project, name)) => (Some(project.trim().to_string()), name.trim()),
            None => (None, target),
        };

        validate_name(name).map_err(|_| invalid("dependency name is not a valid extension name"))?;

        Ok(Self {
            name: name.to_string(),
            project,
            constraint,
        })
    }

    /// Whether `version` satisfies the declared constraint (always true
    /// when no constraint is declared).
    pub fn is_compatible(&self, version: &str) -> bool {
        self.constraint
            .as_ref()
            .is_none_or(|constraint| constraint.satisfies(version))
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(project) = &self.project {
            write!(f, "{project}:")?;
        }
        f.write_str(&self.name)?;
        if let Some(constraint) = &self.constraint {
            write!(f, " ({constraint})")?;
        }
        Ok(())
    }
}

/// A read-only catalog entry describing one installable extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    /// Unique machine name.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    pub description: String,
    pub version: String,
    /// Grouping label such as [`CORE_PACKAGE`] or [`EXPERIMENTAL_PACKAGE`].
    pub package: String,
    /// Already active in the running host.
    pub enabled: bool,
    /// Mandated by the current install profile.
    pub required: bool,
    /// Excluded from listings and from dependency display.
    pub hidden: bool,
    /// Why a required extension is required, shown next to the profile name.
    pub explanation: Option<String>,
    /// This version cannot run on the host core version.
    pub core_incompatible: bool,
    /// Constraint on the host core version, kept for display.
    pub core_requirement: Option<String>,
    /// Minimum host runtime version.
    pub runtime_minimum: Option<String>,
    /// Executables that must be on `PATH` before installing.
    pub required_binaries: Vec<String>,
    /// Declared dependencies, in declaration order.
    pub dependencies: Vec<Dependency>,
    /// Catalog members that declare a dependency on this extension.
    ///
    /// Maintained by [`Catalog`](crate::Catalog); values set by hand are
    /// overwritten when the extension is inserted.
    pub dependents: BTreeSet<String>,
}

impl Extension {
    /// A visible, disabled extension in [`DEFAULT_PACKAGE`] with no
    /// dependencies. The display name defaults to `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            description: String::new(),
            version: String::new(),
            package: DEFAULT_PACKAGE.to_string(),
            enabled: false,
            required: false,
            hidden: false,
            explanation: None,
            core_incompatible: false,
            core_requirement: None,
            runtime_minimum: None,
            required_binaries: Vec::new(),
            dependencies: Vec::new(),
            dependents: BTreeSet::new(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn core_incompatible(mut self) -> Self {
        self.core_incompatible = true;
        self
    }

    pub fn with_runtime_minimum(mut self, minimum: impl Into<String>) -> Self {
        self.runtime_minimum = Some(minimum.into());
        self
    }

    pub fn requires_binary(mut self, tool: impl Into<String>) -> Self {
        self.required_binaries.push(tool.into());
        self
    }

    /// Declare an unconstrained dependency on `name`.
    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(Dependency::new(name));
        self
    }

    /// Declare a dependency.
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Whether this extension belongs to `package`.
    pub fn is_in_package(&self, package: &str) -> bool {
        self.package == package
    }

    /// Whether this extension belongs to [`EXPERIMENTAL_PACKAGE`].
    pub fn is_experimental(&self) -> bool {
        self.is_in_package(EXPERIMENTAL_PACKAGE)
    }

    /// Names of the declared dependencies, in declaration order.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(|dep| dep.name.as_str())
    }
}

/// Validate an extension machine name: non-empty, ASCII alphanumerics,
/// hyphens, and underscores only.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "extension name must not be empty".to_string(),
        });
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason:
                "extension name must contain only alphanumeric characters, hyphens, or underscores"
                    .to_string(),
        });
    }
    Ok(())
}
