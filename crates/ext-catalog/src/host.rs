//! Facts about the running host that extensions are checked against.

use serde::{Deserialize, Serialize};

/// The host an extension would be installed into.
///
/// Passed explicitly wherever compatibility is decided; nothing in this
/// workspace looks these values up from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEnvironment {
    /// Version of the host core, compared against descriptor `core` constraints.
    #[serde(default = "default_core_version")]
    pub core_version: String,
    /// Version of the language runtime, compared against descriptor `runtime` minimums.
    #[serde(default = "default_runtime_version")]
    pub runtime_version: String,
    /// Name of the install profile, reported for profile-required extensions.
    #[serde(default = "default_distribution")]
    pub distribution: String,
}

fn default_core_version() -> String {
    "10.2.0".to_string()
}

fn default_runtime_version() -> String {
    "8.3.0".to_string()
}

fn default_distribution() -> String {
    "Standard".to_string()
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self {
            core_version: default_core_version(),
            runtime_version: default_runtime_version(),
            distribution: default_distribution(),
        }
    }
}

impl HostEnvironment {
    pub fn new(core_version: impl Into<String>, runtime_version: impl Into<String>) -> Self {
        Self {
            core_version: core_version.into(),
            runtime_version: runtime_version.into(),
            ..Self::default()
        }
    }

    pub fn with_distribution(mut self, distribution: impl Into<String>) -> Self {
        self.distribution = distribution.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_table_uses_defaults() {
        let host: HostEnvironment = toml::from_str("core_version = \"11.0\"").unwrap();
        assert_eq!(host.core_version, "11.0");
        assert_eq!(host.runtime_version, "8.3.0");
        assert_eq!(host.distribution, "Standard");
    }
}
