//! Per-extension install eligibility.
//!
//! Summarises everything a selection screen needs to know about one
//! extension: whether it may be selected, why not, the state of each of its
//! dependencies, and who requires it.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::extension::Extension;
use crate::host::HostEnvironment;
use crate::version::meets_minimum;

/// State of one declared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum DependencyState {
    /// Not present in the catalog.
    Missing,
    /// Present, but its version does not satisfy the declared constraint.
    IncompatibleVersion { constraint: String, version: String },
    /// Present, but incompatible with the host core.
    CoreIncompatible,
    /// Present and enabled.
    Enabled,
    /// Present and not yet enabled; will be installed alongside.
    Disabled,
}

impl DependencyState {
    /// Whether this state prevents selecting the dependent extension.
    pub fn blocks_selection(&self) -> bool {
        matches!(
            self,
            Self::Missing | Self::IncompatibleVersion { .. } | Self::CoreIncompatible
        )
    }
}

/// A declared dependency and its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyStatus {
    pub name: String,
    /// Display name, or the machine name when the dependency is missing.
    pub display_name: String,
    #[serde(flatten)]
    pub state: DependencyState,
}

/// Something that requires an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RequiredBy {
    /// The install profile requires it.
    Profile {
        distribution: String,
        explanation: Option<String>,
    },
    /// Another catalog extension depends on it.
    Extension {
        name: String,
        display_name: String,
        enabled: bool,
    },
}

/// Why an extension cannot run on this host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Incompatibility {
    Core {
        requirement: Option<String>,
        core_version: String,
    },
    Runtime {
        minimum: String,
        runtime_version: String,
    },
}

impl std::fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Core {
                requirement: Some(requirement),
                core_version,
            } => write!(
                f,
                "requires core {requirement}, incompatible with core version {core_version}"
            ),
            Self::Core {
                requirement: None,
                core_version,
            } => write!(f, "not compatible with core version {core_version}"),
            Self::Runtime {
                minimum,
                runtime_version,
            } => write!(
                f,
                "requires runtime version {minimum} and is incompatible with runtime version {runtime_version}"
            ),
        }
    }
}

/// Install eligibility of one extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub name: String,
    /// Whether the extension may be ticked for installation.
    pub selectable: bool,
    pub incompatibilities: Vec<Incompatibility>,
    /// Visible declared dependencies, in declaration order.
    pub requires: Vec<DependencyStatus>,
    pub required_by: Vec<RequiredBy>,
}

impl Eligibility {
    /// Human-readable reasons the extension cannot be selected, excluding
    /// the trivial "already enabled" case.
    pub fn blocking_reasons(&self) -> Vec<String> {
        let mut reasons: Vec<String> = self
            .incompatibilities
            .iter()
            .map(ToString::to_string)
            .collect();

        for dep in &self.requires {
            match &dep.state {
                DependencyState::Missing => {
                    reasons.push(format!("requires {} (missing)", dep.display_name));
                }
                DependencyState::IncompatibleVersion {
                    constraint,
                    version,
                } => reasons.push(format!(
                    "requires {} ({constraint}), incompatible with version {version}",
                    dep.display_name
                )),
                DependencyState::CoreIncompatible => reasons.push(format!(
                    "requires {}, which is incompatible with this core version",
                    dep.display_name
                )),
                DependencyState::Enabled | DependencyState::Disabled => {}
            }
        }

        for required_by in &self.required_by {
            if let RequiredBy::Profile { distribution, .. } = required_by {
                reasons.push(format!("required by the {distribution} profile"));
            }
        }

        reasons
    }
}

/// Assess `extension` against the rest of `catalog` and the `host`.
pub fn assess(catalog: &Catalog, extension: &Extension, host: &HostEnvironment) -> Eligibility {
    let mut selectable = !extension.enabled;
    let mut required_by = Vec::new();
    let mut incompatibilities = Vec::new();

    if extension.required {
        selectable = false;
        required_by.push(RequiredBy::Profile {
            distribution: host.distribution.clone(),
            explanation: extension.explanation.clone(),
        });
    }

    if extension.core_incompatible {
        incompatibilities.push(Incompatibility::Core {
            requirement: extension.core_requirement.clone(),
            core_version: host.core_version.clone(),
        });
    }

    if let Some(minimum) = &extension.runtime_minimum {
        if !meets_minimum(&host.runtime_version, minimum) {
            incompatibilities.push(Incompatibility::Runtime {
                minimum: minimum.clone(),
                runtime_version: host.runtime_version.clone(),
            });
        }
    }

    if !incompatibilities.is_empty() {
        selectable = false;
    }

    let mut requires = Vec::new();
    for dependency in &extension.dependencies {
        let status = match catalog.get(&dependency.name) {
            None => DependencyStatus {
                name: dependency.name.clone(),
                display_name: dependency.name.clone(),
                state: DependencyState::Missing,
            },
            Some(target) if target.hidden => continue,
            Some(target) => {
                let state = if !dependency.is_compatible(&target.version) {
                    DependencyState::IncompatibleVersion {
                        constraint: dependency
                            .constraint
                            .as_ref()
                            .map(ToString::to_string)
                            .unwrap_or_default(),
                        version: target.version.clone(),
                    }
                } else if target.core_incompatible {
                    DependencyState::CoreIncompatible
                } else if target.enabled {
                    DependencyState::Enabled
                } else {
                    DependencyState::Disabled
                };
                DependencyStatus {
                    name: target.name.clone(),
                    display_name: target.display_name.clone(),
                    state,
                }
            }
        };

        if status.state.blocks_selection() {
            selectable = false;
        }
        requires.push(status);
    }

    for dependent in catalog.dependents_of(&extension.name) {
        let Some(dependent) = catalog.get(dependent) else {
            continue;
        };
        if dependent.hidden {
            continue;
        }
        required_by.push(RequiredBy::Extension {
            name: dependent.name.clone(),
            display_name: dependent.display_name.clone(),
            enabled: dependent.enabled && extension.enabled,
        });
    }

    Eligibility {
        name: extension.name.clone(),
        selectable,
        incompatibilities,
        requires,
        required_by,
    }
}
