//! Resolver behaviour switches.

use std::fmt;
use std::str::FromStr;

use ext_catalog::EXPERIMENTAL_PACKAGE;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How far removal spreads from an extension that fails its requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CascadeDepth {
    /// Remove only the failing extension's direct dependents.
    #[default]
    Direct,
    /// Remove every extension that depends on the failing one, however
    /// indirectly.
    Transitive,
}

impl FromStr for CascadeDepth {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" | "one-level" => Ok(Self::Direct),
            "transitive" | "full" => Ok(Self::Transitive),
            _ => Err(Error::InvalidOption {
                option: "cascade depth",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CascadeDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Transitive => write!(f, "transitive"),
        }
    }
}

/// Which install-set members get flagged as experimental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperimentalRule {
    /// Flag explicitly selected extensions and pulled-in dependencies, but
    /// not extensions added only because the profile requires them.
    #[default]
    SelectedAndDependencies,
    /// Flag every experimental member of the install set.
    AllCandidates,
}

impl FromStr for ExperimentalRule {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "selected-and-dependencies" | "selected" => Ok(Self::SelectedAndDependencies),
            "all-candidates" | "all" => Ok(Self::AllCandidates),
            _ => Err(Error::InvalidOption {
                option: "experimental rule",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExperimentalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectedAndDependencies => write!(f, "selected-and-dependencies"),
            Self::AllCandidates => write!(f, "all-candidates"),
        }
    }
}

/// Options for [`DependencyResolver`](crate::DependencyResolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    #[serde(default)]
    pub cascade: CascadeDepth,
    #[serde(default)]
    pub experimental: ExperimentalRule,
    /// Package label that marks an extension as experimental.
    #[serde(default = "default_experimental_package")]
    pub experimental_package: String,
}

fn default_experimental_package() -> String {
    EXPERIMENTAL_PACKAGE.to_string()
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            cascade: CascadeDepth::default(),
            experimental: ExperimentalRule::default(),
            experimental_package: default_experimental_package(),
        }
    }
}

impl ResolverOptions {
    pub fn with_cascade(mut self, cascade: CascadeDepth) -> Self {
        self.cascade = cascade;
        self
    }

    pub fn with_experimental_rule(mut self, rule: ExperimentalRule) -> Self {
        self.experimental = rule;
        self
    }
}
