//! Runtime requirements checks consulted by the resolver.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use ext_catalog::{Catalog, HostEnvironment, version::meets_minimum};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Decides whether an extension's runtime requirements are met.
///
/// The resolver calls this once per install-set candidate. Returning
/// `false` blocks the extension and removes its dependents.
pub trait RequirementsChecker {
    fn check_requirements(&self, name: &str) -> bool;
}

impl<F> RequirementsChecker for F
where
    F: Fn(&str) -> bool,
{
    fn check_requirements(&self, name: &str) -> bool {
        self(name)
    }
}

/// Every extension passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllInstallable;

impl RequirementsChecker for AllInstallable {
    fn check_requirements(&self, _name: &str) -> bool {
        true
    }
}

/// The named extensions fail; everything else passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocklist {
    names: BTreeSet<String>,
}

impl Blocklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(mut self, name: impl Into<String>) -> Self {
        self.names.insert(name.into());
        self
    }
}

impl<S: Into<String>> FromIterator<S> for Blocklist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl RequirementsChecker for Blocklist {
    fn check_requirements(&self, name: &str) -> bool {
        !self.names.contains(name)
    }
}

/// One unmet requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RequirementFailure {
    MissingBinary { tool: String },
    RuntimeTooOld { minimum: String, runtime_version: String },
}

impl fmt::Display for RequirementFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBinary { tool } => write!(f, "'{tool}' is not installed or not on PATH"),
            Self::RuntimeTooOld {
                minimum,
                runtime_version,
            } => write!(
                f,
                "requires runtime {minimum}, host runs {runtime_version}"
            ),
        }
    }
}

/// Checks the host for each extension's declared binaries and minimum
/// runtime version.
///
/// Names absent from the catalog pass; the resolver reports them elsewhere.
/// Failures seen by [`check_requirements`](RequirementsChecker::check_requirements)
/// are kept and available from [`failures_for`](Self::failures_for).
#[derive(Debug, Clone)]
pub struct SystemRequirements<'a> {
    catalog: &'a Catalog,
    host: &'a HostEnvironment,
    search_path: Option<OsString>,
    recorded: RefCell<BTreeMap<String, Vec<RequirementFailure>>>,
}

impl<'a> SystemRequirements<'a> {
    pub fn new(catalog: &'a Catalog, host: &'a HostEnvironment) -> Self {
        Self {
            catalog,
            host,
            search_path: None,
            recorded: RefCell::default(),
        }
    }

    /// Search these directories instead of the process `PATH`.
    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    /// List every unmet requirement of `name`.
    pub fn diagnose(&self, name: &str) -> Vec<RequirementFailure> {
        let Some(extension) = self.catalog.get(name) else {
            return Vec::new();
        };

        let mut failures = Vec::new();
        for tool in &extension.required_binaries {
            if let Err(e) = self.locate(tool) {
                tracing::debug!("{}", e);
                failures.push(RequirementFailure::MissingBinary { tool: tool.clone() });
            }
        }

        if let Some(minimum) = &extension.runtime_minimum {
            if !meets_minimum(&self.host.runtime_version, minimum) {
                failures.push(RequirementFailure::RuntimeTooOld {
                    minimum: minimum.clone(),
                    runtime_version: self.host.runtime_version.clone(),
                });
            }
        }

        for failure in &failures {
            tracing::warn!("Extension '{}' requirement not met: {}", name, failure);
        }
        failures
    }

    /// Failures recorded when `name` was last checked.
    pub fn failures_for(&self, name: &str) -> Vec<RequirementFailure> {
        self.recorded.borrow().get(name).cloned().unwrap_or_default()
    }

    fn locate(&self, tool: &str) -> Result<PathBuf> {
        match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_default();
                which::which_in(tool, Some(paths), cwd).map_err(|_| Error::BinaryNotFound {
                    tool: tool.to_string(),
                })
            }
            None => check_binary_on_path(tool),
        }
    }
}

impl RequirementsChecker for SystemRequirements<'_> {
    fn check_requirements(&self, name: &str) -> bool {
        let failures = self.diagnose(name);
        let passed = failures.is_empty();
        let mut recorded = self.recorded.borrow_mut();
        if passed {
            recorded.remove(name);
        } else {
            recorded.insert(name.to_string(), failures);
        }
        passed
    }
}

/// Resolve `tool` against the process `PATH`.
pub fn check_binary_on_path(tool: &str) -> Result<PathBuf> {
    which::which(tool).map_err(|_| Error::BinaryNotFound {
        tool: tool.to_string(),
    })
}
